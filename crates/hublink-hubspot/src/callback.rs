// OAuth callback verification.
//
// Validates the returned state against the stored pending state, exchanges
// the authorization code for credentials, and persists them for one-time
// retrieval. Credentials are written before the pending state is cleared,
// so a crash between the two steps never loses a successful exchange.

use serde::Deserialize;

use hublink_core::config::HubSpotConfig;
use hublink_core::error::{ApiError, ErrorCode, HttpStatus};
use hublink_core::storage::{credentials_key, pending_state_key, SecondaryStorage};
use hublink_oauth2::code_exchange::{exchange_code, CodeExchangeParams};
use hublink_oauth2::state::{decode_state, PendingState};

use crate::EPHEMERAL_TTL_SECS;

/// Query parameters the provider sends to the callback endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

const CLOSE_WINDOW_HTML: &str = "<html>\n  <script>\n    window.close();\n  </script>\n</html>\n";

/// Acknowledgment returned on a verified callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackAck;

impl CallbackAck {
    /// Minimal page that closes the popup window the flow was started in.
    pub fn html(&self) -> &'static str {
        CLOSE_WINDOW_HTML
    }
}

/// Verify a provider callback and persist the exchanged credentials.
///
/// Replaying a callback after its pending state was consumed always fails
/// with `StateMismatch`.
pub async fn handle_callback(
    store: &dyn SecondaryStorage,
    client: &reqwest::Client,
    config: &HubSpotConfig,
    query: &CallbackQuery,
) -> Result<CallbackAck, ApiError> {
    // Provider-reported errors short-circuit before any storage access.
    if let Some(error) = &query.error {
        let detail = query.error_description.as_deref().unwrap_or(error);
        return Err(ApiError::with_message(
            HttpStatus::BadRequest,
            ErrorCode::AuthorizationDenied,
            detail,
        ));
    }

    let token = query
        .state
        .as_deref()
        .ok_or_else(|| ApiError::bad_request(ErrorCode::InvalidState))?;
    let state = decode_state(token)
        .map_err(|e| ApiError::with_message(HttpStatus::BadRequest, ErrorCode::InvalidState, e.to_string()))?;

    let state_key = pending_state_key(&state.org_id, &state.user_id);
    let saved: Option<PendingState> = store
        .get(&state_key)
        .await?
        .and_then(|raw| serde_json::from_str(&raw).ok());
    match saved {
        Some(saved) if saved.nonce == state.nonce => {}
        _ => return Err(ApiError::bad_request(ErrorCode::StateMismatch)),
    }

    let code = query.code.as_deref().ok_or_else(|| {
        ApiError::with_message(
            HttpStatus::BadRequest,
            ErrorCode::TokenExchangeFailed,
            "authorization code missing from callback",
        )
    })?;

    let credentials = exchange_code(
        client,
        CodeExchangeParams {
            token_endpoint: &config.token_url,
            code,
            redirect_uri: &config.redirect_uri,
            client_id: &config.client_id,
            client_secret: &config.client_secret,
        },
    )
    .await
    .map_err(|e| {
        tracing::warn!(org_id = %state.org_id, user_id = %state.user_id, error = %e, "token exchange failed");
        ApiError::with_message(HttpStatus::BadRequest, ErrorCode::TokenExchangeFailed, e.to_string())
    })?;

    // Credentials first, pending state second.
    let creds_key = credentials_key(&state.org_id, &state.user_id);
    store
        .set(&creds_key, &credentials.raw_json(), Some(EPHEMERAL_TTL_SECS))
        .await?;
    store.delete(&state_key).await?;

    tracing::info!(org_id = %state.org_id, user_id = %state.user_id, "authorization callback verified");
    Ok(CallbackAck)
}
