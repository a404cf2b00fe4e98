// Tests for the paginated fetch against mock list endpoints: cursor
// following, per-type failure isolation, retry behavior, and the
// normalized output shape.

use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hublink_core::config::HubSpotConfig;
use hublink_core::error::ErrorCode;
use hublink_hubspot::fetch_items;
use hublink_hubspot::items::MAX_PAGES_PER_TYPE;
use hublink_oauth2::credentials::Credentials;

fn test_config(server: &MockServer) -> HubSpotConfig {
    HubSpotConfig {
        api_base_url: format!("{}/crm/v3/objects", server.uri()),
        ..HubSpotConfig::new("client-id", "client-secret", "http://localhost:8000/callback")
    }
}

fn test_credentials() -> Credentials {
    Credentials::from_raw(serde_json::json!({"access_token": "tok"}))
}

fn page_body(ids: &[&str], first_name: &str, after: Option<&str>) -> serde_json::Value {
    let results: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({"id": id, "properties": {"firstname": first_name}}))
        .collect();
    match after {
        Some(cursor) => serde_json::json!({
            "results": results,
            "paging": {"next": {"after": cursor}},
        }),
        None => serde_json::json!({"results": results, "paging": {}}),
    }
}

async fn mount_empty_companies(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/companies"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn follows_pagination_cursor_exactly_once_per_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("after"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(&["001"], "John", Some("X"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .and(query_param("after", "X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["002"], "Jane", None)))
        .expect(1)
        .mount(&server)
        .await;

    mount_empty_companies(&server).await;

    let client = reqwest::Client::new();
    let items = fetch_items(&client, &test_config(&server), &test_credentials())
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["001_Contact", "002_Contact"]);
    assert_eq!(items[0].name.as_deref(), Some("John"));
}

#[tokio::test]
async fn terminal_page_triggers_no_follow_up() {
    let server = MockServer::start().await;

    // No paging cursor at all: exactly one request for this type.
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["001"], "John", None)))
        .expect(1)
        .mount(&server)
        .await;

    mount_empty_companies(&server).await;

    let client = reqwest::Client::new();
    let items = fetch_items(&client, &test_config(&server), &test_credentials())
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn sends_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["001"], "John", None)))
        .expect(1)
        .mount(&server)
        .await;

    mount_empty_companies(&server).await;

    let client = reqwest::Client::new();
    fetch_items(&client, &test_config(&server), &test_credentials())
        .await
        .unwrap();
}

#[tokio::test]
async fn server_errors_are_retried_then_the_type_is_skipped() {
    let server = MockServer::start().await;

    // Initial attempt plus two retries, then the type stops.
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"id": "900", "properties": {"name": "Acme"}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let items = fetch_items(&client, &test_config(&server), &test_credentials())
        .await
        .unwrap();

    // The failing type contributes nothing; the other still lands.
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "900_Company");
    assert_eq!(items[0].name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    mount_empty_companies(&server).await;

    let client = reqwest::Client::new();
    let items = fetch_items(&client, &test_config(&server), &test_credentials())
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn page_ceiling_bounds_runaway_pagination() {
    let server = MockServer::start().await;

    // Every page advertises another page; the ceiling has to cut it off.
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(&["001"], "John", Some("X"))),
        )
        .expect(u64::from(MAX_PAGES_PER_TYPE))
        .mount(&server)
        .await;

    mount_empty_companies(&server).await;

    let client = reqwest::Client::new();
    let items = fetch_items(&client, &test_config(&server), &test_credentials())
        .await
        .unwrap();
    assert_eq!(items.len(), MAX_PAGES_PER_TYPE as usize);
}

#[tokio::test]
async fn credentials_without_access_token_are_rejected() {
    let server = MockServer::start().await;
    let client = reqwest::Client::new();
    let credentials = Credentials::from_raw(serde_json::json!({"token_type": "bearer"}));

    let err = fetch_items(&client, &test_config(&server), &credentials)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NoCredentials);
}

#[tokio::test]
async fn output_serializes_as_the_canonical_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["001"], "John", None)))
        .mount(&server)
        .await;
    mount_empty_companies(&server).await;

    let client = reqwest::Client::new();
    let items = fetch_items(&client, &test_config(&server), &test_credentials())
        .await
        .unwrap();

    let json = serde_json::to_value(&items).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "id": "001_Contact",
            "name": "John",
            "type": "Contact",
            "parent_id": null,
            "parent_path_or_name": null,
        }])
    );
}
