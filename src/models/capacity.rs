// Capacity document (YAML): the worker pool that drains the rate-based queue.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapacityConfig {
    #[serde(default)]
    pub providers: Vec<CapacityProvider>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityProvider {
    pub name: String,
    #[serde(rename = "max-servers", default)]
    pub max_servers: u32,
}

impl CapacityConfig {
    /// Total concurrent job slots across all providers.
    pub fn max_capacity(&self) -> u32 {
        self.providers
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.max_servers))
    }
}
