// Authorization code exchange.
//
// Exchanges the callback's authorization code for credentials at the
// provider's token endpoint. Client credentials travel in the form body.

use crate::credentials::Credentials;

/// Parameters for exchanging an authorization code.
#[derive(Debug, Clone)]
pub struct CodeExchangeParams<'a> {
    /// Token endpoint URL.
    pub token_endpoint: &'a str,
    /// The authorization code from the callback.
    pub code: &'a str,
    /// Must match the redirect URI used in the authorization request.
    pub redirect_uri: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Errors from the token exchange.
#[derive(Debug, thiserror::Error)]
pub enum TokenExchangeError {
    #[error("token endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint returned {status}: {body}")]
    Endpoint {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Exchange an authorization code for credentials.
pub async fn exchange_code(
    client: &reqwest::Client,
    params: CodeExchangeParams<'_>,
) -> Result<Credentials, TokenExchangeError> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", params.code),
        ("redirect_uri", params.redirect_uri),
        ("client_id", params.client_id),
        ("client_secret", params.client_secret),
    ];

    let response = client
        .post(params.token_endpoint)
        .form(&form)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(TokenExchangeError::Endpoint { status, body });
    }

    let data: serde_json::Value = response.json().await?;
    Ok(Credentials::from_raw(data))
}
