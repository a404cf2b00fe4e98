// Paginated fetch & normalization.
//
// Walks the CRM list endpoints across the configured object types,
// following the cursor in `paging.next.after`, and converts each remote
// record into a canonical `IntegrationItem`. A failing object type stops
// its own pagination but never aborts the others.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use hublink_core::config::HubSpotConfig;
use hublink_core::error::{ApiError, ErrorCode, HttpStatus};
use hublink_oauth2::credentials::Credentials;

/// Records requested per list call.
pub const PAGE_SIZE: u32 = 10;

/// Upper bound on pages fetched per object type.
pub const MAX_PAGES_PER_TYPE: u32 = 100;

/// Suffix appended to parent record ids.
pub const PROVIDER_SUFFIX: &str = "Hubspot";

/// Remote object types fetched, in output order: type label → collection path.
pub const HUBSPOT_OBJECTS: &[(&str, &str)] = &[("Contact", "contacts"), ("Company", "companies")];

const RETRY_LIMIT: u32 = 2;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Canonical normalized representation of a remote CRM record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationItem {
    /// Remote id suffixed with the object type, e.g. `001_Contact`.
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    /// Parent record id suffixed with the provider name, when present.
    pub parent_id: Option<String>,
    pub parent_path_or_name: Option<String>,
}

/// Normalize one remote record into an `IntegrationItem`.
///
/// The display name is the first non-empty of `properties.name`,
/// `properties.firstname`, `properties.lastname`.
pub fn integration_item(
    record: &serde_json::Value,
    item_type: &str,
    parent_id: Option<&str>,
    parent_name: Option<&str>,
) -> IntegrationItem {
    let remote_id = record
        .get("id")
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();

    let properties = record.get("properties");
    let name = ["name", "firstname", "lastname"].iter().find_map(|field| {
        properties?
            .get(field)?
            .as_str()
            .filter(|s| !s.is_empty())
            .map(String::from)
    });

    IntegrationItem {
        id: format!("{remote_id}_{item_type}"),
        name,
        item_type: item_type.to_string(),
        parent_id: parent_id.map(|p| format!("{p}_{PROVIDER_SUFFIX}")),
        parent_path_or_name: parent_name.map(String::from),
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct NextPage {
    after: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum FetchPageError {
    #[error("list request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("list endpoint returned {status}: {body}")]
    Endpoint {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl FetchPageError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Endpoint { status, .. } => status.is_server_error(),
        }
    }
}

/// Fetch and normalize all records across the configured object types.
///
/// Items are ordered by object-type declaration order, then page order,
/// then within-page order. A non-success page stops that object type and
/// the fetch moves on, so the result always holds whatever was gathered.
pub async fn fetch_items(
    client: &reqwest::Client,
    config: &HubSpotConfig,
    credentials: &Credentials,
) -> Result<Vec<IntegrationItem>, ApiError> {
    let access_token = credentials.access_token().ok_or_else(|| {
        ApiError::with_message(
            HttpStatus::BadRequest,
            ErrorCode::NoCredentials,
            "credentials carry no access token",
        )
    })?;

    let mut items = Vec::new();
    for &(item_type, collection) in HUBSPOT_OBJECTS {
        fetch_object_type(client, config, access_token, item_type, collection, &mut items).await;
    }
    Ok(items)
}

async fn fetch_object_type(
    client: &reqwest::Client,
    config: &HubSpotConfig,
    access_token: &str,
    item_type: &str,
    collection: &str,
    items: &mut Vec<IntegrationItem>,
) {
    let url = format!("{}/{}", config.api_base_url.trim_end_matches('/'), collection);
    let mut after: Option<String> = None;

    for _ in 0..MAX_PAGES_PER_TYPE {
        let page = match fetch_page(client, &url, access_token, after.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(collection, error = %e, "stopping pagination for object type");
                return;
            }
        };

        for record in &page.results {
            items.push(integration_item(record, item_type, None, None));
        }

        after = page.paging.and_then(|p| p.next).and_then(|n| n.after);
        if after.is_none() {
            return;
        }
    }

    tracing::warn!(
        collection,
        limit = MAX_PAGES_PER_TYPE,
        "page ceiling reached, stopping pagination for object type"
    );
}

/// Fetch one page, retrying transient failures (5xx, transport) with a
/// short doubling backoff. Client errors are never retried.
async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
    after: Option<&str>,
) -> Result<ListResponse, FetchPageError> {
    let mut attempt = 0;
    loop {
        match try_fetch_page(client, url, access_token, after).await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_transient() && attempt < RETRY_LIMIT => {
                let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                tracing::debug!(url, attempt, error = %e, "retrying list request");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn try_fetch_page(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
    after: Option<&str>,
) -> Result<ListResponse, FetchPageError> {
    let mut request = client
        .get(url)
        .bearer_auth(access_token)
        .query(&[("limit", PAGE_SIZE.to_string())]);
    if let Some(after) = after {
        request = request.query(&[("after", after)]);
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(FetchPageError::Endpoint { status, body });
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_contact_with_firstname() {
        let record = serde_json::json!({"id": "001", "properties": {"firstname": "John"}});
        let item = integration_item(&record, "Contact", None, None);
        assert_eq!(
            item,
            IntegrationItem {
                id: "001_Contact".into(),
                name: Some("John".into()),
                item_type: "Contact".into(),
                parent_id: None,
                parent_path_or_name: None,
            }
        );
    }

    #[test]
    fn name_prefers_name_over_firstname_and_lastname() {
        let record = serde_json::json!({
            "id": "9",
            "properties": {"name": "Acme", "firstname": "John", "lastname": "Doe"},
        });
        let item = integration_item(&record, "Company", None, None);
        assert_eq!(item.name.as_deref(), Some("Acme"));
    }

    #[test]
    fn empty_name_fields_are_skipped() {
        let record = serde_json::json!({
            "id": "9",
            "properties": {"name": "", "firstname": "", "lastname": "Doe"},
        });
        let item = integration_item(&record, "Contact", None, None);
        assert_eq!(item.name.as_deref(), Some("Doe"));
    }

    #[test]
    fn missing_properties_gives_no_name() {
        let record = serde_json::json!({"id": "9"});
        let item = integration_item(&record, "Contact", None, None);
        assert_eq!(item.name, None);
    }

    #[test]
    fn numeric_remote_ids_are_stringified() {
        let record = serde_json::json!({"id": 42, "properties": {}});
        let item = integration_item(&record, "Company", None, None);
        assert_eq!(item.id, "42_Company");
    }

    #[test]
    fn parent_id_gets_provider_suffix() {
        let record = serde_json::json!({"id": "001", "properties": {}});
        let item = integration_item(&record, "Contact", Some("p1"), Some("Parent Co"));
        assert_eq!(item.parent_id.as_deref(), Some("p1_Hubspot"));
        assert_eq!(item.parent_path_or_name.as_deref(), Some("Parent Co"));
    }

    #[test]
    fn serializes_with_type_field() {
        let record = serde_json::json!({"id": "001", "properties": {"firstname": "John"}});
        let item = integration_item(&record, "Contact", None, None);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "001_Contact");
        assert_eq!(json["type"], "Contact");
        assert_eq!(json["parent_id"], serde_json::Value::Null);
    }

    #[test]
    fn object_types_are_in_declaration_order() {
        assert_eq!(HUBSPOT_OBJECTS[0], ("Contact", "contacts"));
        assert_eq!(HUBSPOT_OBJECTS[1], ("Company", "companies"));
    }
}
