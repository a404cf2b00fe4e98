#![doc = include_str!("../README.md")]

pub mod authorization_url;
pub mod code_exchange;
pub mod credentials;
pub mod http;
pub mod state;

// Re-exports
pub use authorization_url::{create_authorization_url, AuthorizationUrlParams};
pub use code_exchange::{exchange_code, CodeExchangeParams, TokenExchangeError};
pub use credentials::Credentials;
pub use http::default_http_client;
pub use state::{decode_state, encode_state, PendingState, StateDecodeError};
