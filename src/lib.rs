// Library for tests to access modules

pub mod cache;
pub mod capacity;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed_repo;
pub mod history_repo;
pub mod history_service;
pub mod models;
pub mod routes;
pub mod status;
pub mod version;
pub mod worker;
