// Authorization initiation.
//
// Generates the nonce-bearing state token, records the pending state in the
// ephemeral store, and returns the URL the user's browser navigates to.

use hublink_core::config::HubSpotConfig;
use hublink_core::error::ApiError;
use hublink_core::random::generate_nonce;
use hublink_core::storage::{pending_state_key, SecondaryStorage};
use hublink_oauth2::authorization_url::{create_authorization_url, AuthorizationUrlParams};
use hublink_oauth2::state::{encode_state, PendingState};

use crate::EPHEMERAL_TTL_SECS;

/// Start the authorization flow for an (org, user) pair.
///
/// Writes the pending state under `pending_state:{org}:{user}` with a
/// 600s TTL and returns the provider authorization URL. Makes no network
/// call; the only failure mode is storage unavailability.
pub async fn authorize(
    store: &dyn SecondaryStorage,
    config: &HubSpotConfig,
    user_id: &str,
    org_id: &str,
) -> Result<String, ApiError> {
    let state = PendingState {
        nonce: generate_nonce(),
        user_id: user_id.to_string(),
        org_id: org_id.to_string(),
    };
    let token = encode_state(&state);

    let key = pending_state_key(org_id, user_id);
    let value = serde_json::to_string(&state).unwrap_or_default();
    store.set(&key, &value, Some(EPHEMERAL_TTL_SECS)).await?;

    let url = create_authorization_url(AuthorizationUrlParams {
        authorization_endpoint: &config.authorization_url,
        client_id: &config.client_id,
        redirect_uri: &config.redirect_uri,
        scopes: &config.scopes,
        state: &token,
    })
    .map_err(|e| ApiError::internal(format!("authorization endpoint URL is invalid: {e}")))?;

    tracing::debug!(org_id, user_id, "authorization flow initiated");
    Ok(url.to_string())
}
