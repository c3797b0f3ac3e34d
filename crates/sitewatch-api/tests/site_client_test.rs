#![allow(clippy::unwrap_used)]
// Integration tests for `SiteClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitewatch_api::{CreatedSite, Error, SiteClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SiteClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = SiteClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sites_preserves_server_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 7,
                "url": "https://b.example",
                "name": "B",
                "is_up": true,
                "last_check": "2024-06-15 10:30:00.123456",
                "consecutive_failures": 0
            },
            {
                "id": 2,
                "url": "https://a.example",
                "name": "",
                "is_up": null,
                "last_check": null,
                "consecutive_failures": 0
            }
        ])))
        .mount(&server)
        .await;

    let sites = client.list_sites().await.unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id, 7);
    assert_eq!(sites[0].is_up, Some(true));
    assert_eq!(sites[1].id, 2);
    assert_eq!(sites[1].is_up, None);
}

#[tokio::test]
async fn test_list_sites_server_error_is_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sites"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = client.list_sites().await;
    assert!(
        matches!(result, Err(Error::Status { status: 503 })),
        "expected Status error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_sites_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_sites().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn test_fetch_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_sites": 3,
            "up_sites": 2,
            "down_sites": 1,
            "recent_checks": [{
                "url": "https://a.example",
                "is_up": false,
                "checked_at": "2024-06-15 10:30:00",
                "response_time": null,
                "error_message": "Connection refused"
            }]
        })))
        .mount(&server)
        .await;

    let stats = client.fetch_stats().await.unwrap();
    assert_eq!(stats.total_sites, 3);
    assert_eq!(stats.up_sites, 2);
    assert_eq!(stats.down_sites, 1);
    assert_eq!(stats.recent_checks.len(), 1);
    assert_eq!(
        stats.recent_checks[0].error_message.as_deref(),
        Some("Connection refused")
    );
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_site_sends_url_and_name() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sites"))
        .and(body_json(json!({"url": "example.com", "name": ""})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5, "url": "example.com", "name": "", "is_up": null, "last_check": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_site("example.com", "").await.unwrap();
    assert_eq!(created.id(), Some(5));
    assert!(matches!(created, CreatedSite::Site(_)));
}

#[tokio::test]
async fn test_create_site_with_unrecognized_body_still_succeeds() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sites"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_site("example.com", "").await.unwrap();
    assert_eq!(created, CreatedSite::Accepted);
    assert_eq!(created.id(), None);
}

#[tokio::test]
async fn test_create_site_with_empty_body_still_succeeds() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sites"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let created = client.create_site("example.com", "").await.unwrap();
    assert_eq!(created, CreatedSite::Accepted);
}

#[tokio::test]
async fn test_create_site_rejection_surfaces_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sites"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Сайт уже существует"})),
        )
        .mount(&server)
        .await;

    let err = client.create_site("example.com", "").await.unwrap_err();
    assert_eq!(err.server_message(), Some("Сайт уже существует"));
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_create_site_detail_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sites"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "URL обязателен"})))
        .mount(&server)
        .await;

    let err = client.create_site(" ", "").await.unwrap_err();
    assert_eq!(err.to_string(), "URL обязателен");
}

#[tokio::test]
async fn test_delete_site() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/sites/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_site(42).await.unwrap();
}

#[tokio::test]
async fn test_force_check_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sites/3/check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    client.force_check(3).await.unwrap();
}

#[tokio::test]
async fn test_force_check_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sites/99/check"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Сайт не найден"})))
        .mount(&server)
        .await;

    let err = client.force_check(99).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    // Nothing listens on the discard port.
    let client = SiteClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
    );
    let result = client.list_sites().await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
