#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod logging;
pub mod random;
pub mod storage;

// Re-exports for convenience
pub use config::{ConfigError, HubSpotConfig};
pub use error::{ApiError, ErrorCode, HttpStatus};
pub use random::generate_nonce;
pub use storage::{MemorySecondaryStorage, SecondaryStorage, StorageError};
