// One-time credential retrieval.

use hublink_core::error::{ApiError, ErrorCode};
use hublink_core::storage::{credentials_key, SecondaryStorage};
use hublink_oauth2::credentials::Credentials;

/// Fetch and invalidate the stored credentials for an (org, user) pair.
///
/// The entry is deleted as soon as it is read, before the payload is even
/// inspected: a second call always fails with `NoCredentials`, and a
/// corrupt blob is consumed exactly once too.
pub async fn consume_credentials(
    store: &dyn SecondaryStorage,
    user_id: &str,
    org_id: &str,
) -> Result<Credentials, ApiError> {
    let key = credentials_key(org_id, user_id);
    let raw = store
        .get(&key)
        .await?
        .ok_or_else(|| ApiError::bad_request(ErrorCode::NoCredentials))?;
    store.delete(&key).await?;

    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|_| ApiError::bad_request(ErrorCode::NoCredentials))?;
    let credentials = Credentials::from_raw(value);
    if credentials.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::NoCredentials));
    }

    Ok(credentials)
}
