// HubSpot provider configuration.
//
// An explicit struct passed into each component at construction, so tests
// can run against local endpoints without process-wide environment state.

pub const DEFAULT_AUTHORIZATION_URL: &str = "https://app.hubspot.com/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";
pub const DEFAULT_API_BASE_URL: &str = "https://api.hubapi.com/crm/v3/objects";

/// Configuration for the HubSpot OAuth app and API endpoints.
#[derive(Debug, Clone)]
pub struct HubSpotConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered with the OAuth app; the callback endpoint
    /// must be reachable at this address.
    pub redirect_uri: String,
    pub authorization_url: String,
    pub token_url: String,
    /// Base URL for the CRM object list endpoints, without a trailing slash.
    pub api_base_url: String,
    pub scopes: Vec<String>,
}

/// Errors raised while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

impl HubSpotConfig {
    /// Build a configuration against the production HubSpot endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            authorization_url: DEFAULT_AUTHORIZATION_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            scopes: default_scopes(),
        }
    }

    /// Load configuration from `HUBSPOT_*` environment variables.
    ///
    /// Client id, secret, and redirect URI are required; endpoint URLs fall
    /// back to the production defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: require_var("HUBSPOT_CLIENT_ID")?,
            client_secret: require_var("HUBSPOT_CLIENT_SECRET")?,
            redirect_uri: require_var("HUBSPOT_REDIRECT_URI")?,
            authorization_url: var_or("HUBSPOT_AUTH_URL", DEFAULT_AUTHORIZATION_URL),
            token_url: var_or("HUBSPOT_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_base_url: var_or("HUBSPOT_API_BASE_URL", DEFAULT_API_BASE_URL),
            scopes: default_scopes(),
        })
    }

    /// The space-joined scope string for the authorization URL.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

/// Scopes requested from HubSpot: the base OAuth scope plus read/write
/// access to contacts and companies.
fn default_scopes() -> Vec<String> {
    [
        "oauth",
        "crm.objects.contacts.read",
        "crm.objects.contacts.write",
        "crm.objects.companies.read",
        "crm.objects.companies.write",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
