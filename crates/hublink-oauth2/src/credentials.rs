// Token-response credentials.
//
// The token endpoint's JSON body is treated as an opaque blob: a typed view
// exposes the standard fields, while `raw` preserves everything the
// provider returned so a storage round-trip loses nothing.

use serde::{Deserialize, Serialize};

/// Credentials returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds, as reported by the provider.
    pub expires_in: Option<i64>,
    /// The full token response, including provider-specific fields.
    pub raw: serde_json::Value,
}

/// Standard token-response fields (snake_case wire format).
#[derive(Debug, Default, Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl Credentials {
    /// Parse a raw token response, keeping the original blob alongside the
    /// typed fields.
    pub fn from_raw(data: serde_json::Value) -> Self {
        let parsed: RawTokenResponse =
            serde_json::from_value(data.clone()).unwrap_or_default();

        Self {
            access_token: parsed.access_token,
            token_type: parsed.token_type,
            refresh_token: parsed.refresh_token,
            expires_in: parsed.expires_in,
            raw: data,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Whether the underlying blob carries nothing usable.
    pub fn is_empty(&self) -> bool {
        match &self.raw {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// The raw blob as JSON text, for ephemeral storage.
    pub fn raw_json(&self) -> String {
        self.raw.to_string()
    }
}
