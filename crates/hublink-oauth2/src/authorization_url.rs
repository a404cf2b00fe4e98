// Authorization URL builder.

/// Parameters for building an authorization URL.
#[derive(Debug, Clone)]
pub struct AuthorizationUrlParams<'a> {
    /// Authorization endpoint URL.
    pub authorization_endpoint: &'a str,
    /// OAuth client ID.
    pub client_id: &'a str,
    /// Redirect URI for the callback.
    pub redirect_uri: &'a str,
    /// Requested scopes, joined with spaces.
    pub scopes: &'a [String],
    /// Encoded CSRF state token.
    pub state: &'a str,
}

/// Build the browser-navigated authorization URL.
pub fn create_authorization_url(
    params: AuthorizationUrlParams<'_>,
) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(params.authorization_endpoint)?;

    url.query_pairs_mut()
        .append_pair("client_id", params.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", params.redirect_uri)
        .append_pair("scope", &params.scopes.join(" "))
        .append_pair("state", params.state);

    Ok(url)
}
