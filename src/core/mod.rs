// src/core/mod.rs
//! Core services shared by every flow: configuration, storage, HTTP

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use database::Database;
pub use fs_ops::FsOps;
pub use service_client::{ServiceClient, ServiceError};
