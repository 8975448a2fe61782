//! Infrastructure layer: stores, workflows, configuration and adapters.

pub mod config;
pub mod hashing;
pub mod store;
pub mod workflow;

pub use config::{AppConfig, ConfigError};
pub use hashing::Argon2PasswordHasher;
pub use store::StoreError;
