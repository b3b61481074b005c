#![allow(clippy::unwrap_used)]
// Integration tests for `MistClient` using wiremock.

use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mistly_api::{DeviceClass, Error, MistClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MistClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MistClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn org_id() -> Uuid {
    Uuid::parse_str("3f1c8b2a-0d4e-4c6f-9a7b-1e2d3c4b5a69").unwrap()
}

// ── /self/self ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_self_privileges() {
    let (server, client) = setup().await;

    let body = json!({
        "email": "noc@example.com",
        "privileges": [
            {
                "scope": "org",
                "role": "admin",
                "org_id": "3f1c8b2a-0d4e-4c6f-9a7b-1e2d3c4b5a69",
                "name": "Acme HQ"
            },
            {
                "scope": "site",
                "role": "read",
                "site_id": "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/self/self"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let me = client.get_self().await.unwrap();

    assert_eq!(me.email.as_deref(), Some("noc@example.com"));
    assert_eq!(me.privileges.len(), 2);
    assert_eq!(me.privileges[0].org_id, Some(org_id()));
    assert_eq!(me.privileges[0].display_name(), "Acme HQ");
    // Site-scope entries carry no org_id in this payload.
    assert_eq!(me.privileges[1].org_id, None);
}

#[tokio::test]
async fn test_get_self_org_name_field_preferred() {
    let (server, client) = setup().await;

    let body = json!({
        "privileges": [{
            "scope": "org",
            "org_id": "3f1c8b2a-0d4e-4c6f-9a7b-1e2d3c4b5a69",
            "org_name": "Acme HQ",
            "name": "stale-alias"
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/self/self"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let me = client.get_self().await.unwrap();
    assert_eq!(me.privileges[0].display_name(), "Acme HQ");
}

// ── Licenses ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_license_summary() {
    let (server, client) = setup().await;

    let body = json!({
        "summary": { "SUB-MAN": 50, "SUB-AI": 10 },
        "usages": { "SUB-MAN": 42 },
        "licenses": [{
            "id": "11111111-2222-3333-4444-555555555555",
            "type": "SUB-MAN",
            "quantity": 50,
            "start_time": 1700000000,
            "end_time": 1790000000
        }]
    });

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/orgs/{}/licenses", org_id())))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let summary = client.get_license_summary(org_id()).await.unwrap();

    assert_eq!(summary.summary.get("SUB-MAN"), Some(&50));
    assert_eq!(summary.summary.get("SUB-AI"), Some(&10));
    assert_eq!(summary.usages.get("SUB-MAN"), Some(&42));
    assert_eq!(summary.licenses.len(), 1);
    assert_eq!(summary.licenses[0].sku.as_deref(), Some("SUB-MAN"));
    assert_eq!(summary.licenses[0].quantity, Some(50));
}

#[tokio::test]
async fn test_license_summary_empty_org() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/orgs/{}/licenses", org_id())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let summary = client.get_license_summary(org_id()).await.unwrap();
    assert!(summary.summary.is_empty());
    assert!(summary.usages.is_empty());
    assert!(summary.licenses.is_empty());
}

// ── Inventory counts ────────────────────────────────────────────────

#[tokio::test]
async fn test_count_inventory_from_page_total_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/orgs/{}/inventory", org_id())))
        .and(query_param("type", "ap"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Page-Total", "37")
                .set_body_json(json!([{ "mac": "5c5b350e0001" }])),
        )
        .mount(&server)
        .await;

    let count = client.count_inventory(org_id(), DeviceClass::Ap).await.unwrap();
    assert_eq!(count, 37);
}

#[tokio::test]
async fn test_count_inventory_falls_back_to_count_endpoint() {
    let (server, client) = setup().await;

    // No X-Page-Total header on the probe response.
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/orgs/{}/inventory", org_id())))
        .and(query_param("type", "switch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/orgs/{}/inventory/count", org_id())))
        .and(query_param("type", "switch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 12 })))
        .mount(&server)
        .await;

    let count = client
        .count_inventory(org_id(), DeviceClass::Switch)
        .await
        .unwrap();
    assert_eq!(count, 12);
}

#[tokio::test]
async fn test_inventory_counts_totals_all_classes() {
    let (server, client) = setup().await;

    for (class, total) in [("ap", "5"), ("switch", "3"), ("gateway", "1")] {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/orgs/{}/inventory", org_id())))
            .and(query_param("type", class))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Page-Total", total)
                    .set_body_json(json!([])),
            )
            .mount(&server)
            .await;
    }

    let counts = client.inventory_counts(org_id()).await.unwrap();
    assert_eq!(counts.aps, 5);
    assert_eq!(counts.switches, 3);
    assert_eq!(counts.gateways, 1);
    assert_eq!(counts.total, 9);
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_self().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_forbidden_carries_detail_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/orgs/{}", org_id())))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "detail": "Org access denied" })),
        )
        .mount(&server)
        .await;

    match client.get_org(org_id()).await {
        Err(Error::PermissionDenied { ref message }) => {
            assert!(
                message.contains("Org access denied"),
                "expected detail in message, got: {message}"
            );
        }
        other => panic!("expected PermissionDenied error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    match client.get_self().await {
        Err(Error::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 17),
        other => panic!("expected RateLimited error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/self/self"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.get_self().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
