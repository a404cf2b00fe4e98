// OAuth2 state token codec.
//
// The state parameter round-trips through the provider as an opaque,
// URL-safe token. It is not encrypted — the embedded nonce, checked against
// the stored pending state on callback, is the CSRF defense.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// State stored at authorization start and echoed back by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingState {
    /// Single-use random value proving the callback corresponds to a
    /// specific initiated flow.
    pub nonce: String,
    pub user_id: String,
    pub org_id: String,
}

/// Errors from decoding a state token.
#[derive(Debug, thiserror::Error)]
pub enum StateDecodeError {
    #[error("state token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("state token payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Encode a pending state as a URL-safe token.
pub fn encode_state(state: &PendingState) -> String {
    // Serializing three string fields cannot fail; an empty token would
    // simply fail decoding on the way back.
    let json = serde_json::to_vec(state).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a state token back into a `PendingState`.
pub fn decode_state(token: &str) -> Result<PendingState, StateDecodeError> {
    let json = URL_SAFE_NO_PAD.decode(token)?;
    Ok(serde_json::from_slice(&json)?)
}
