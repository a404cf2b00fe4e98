// Shared HTTP client construction.

use std::time::Duration;

/// Request timeout applied to all provider calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client used for token-exchange and list calls, with an
/// explicit request timeout.
pub fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}
