// Body decoders for the two remote documents.

use crate::error::ParseError;
use crate::models::{CapacityConfig, StatusDocument};

pub fn parse_status(bytes: &[u8]) -> Result<StatusDocument, ParseError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn parse_capacity(bytes: &[u8]) -> Result<CapacityConfig, ParseError> {
    Ok(serde_yaml::from_slice(bytes)?)
}
