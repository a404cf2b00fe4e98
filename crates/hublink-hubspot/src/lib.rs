#![doc = include_str!("../README.md")]

pub mod authorize;
pub mod callback;
pub mod credentials;
pub mod items;

/// TTL for pending state and stored credentials, in seconds.
pub const EPHEMERAL_TTL_SECS: u64 = 600;

// Re-exports
pub use authorize::authorize;
pub use callback::{handle_callback, CallbackAck, CallbackQuery};
pub use credentials::consume_credentials;
pub use items::{fetch_items, integration_item, IntegrationItem, HUBSPOT_OBJECTS};
