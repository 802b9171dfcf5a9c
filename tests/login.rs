//! Integration tests for the two login paths.

use std::io::Write;
use std::time::Duration;

use serde_json::json;
use teslactl::{login_with_config, stored_token_login_with_config, TeslaApiError};
use wiremock::matchers::{bearer_token, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn password_login_yields_a_bearer_carrying_root() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("email=elon%40example.com"))
        .and(body_string_contains("password=hunter2"))
        .and(body_string_contains("client_id="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok123",
            "token_type": "bearer",
            "expires_in": 3888000
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/1/vehicles"))
        .and(bearer_token("tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .mount(&server)
        .await;

    let root = login_with_config(&server.uri(), "elon@example.com", "hunter2", TIMEOUT)
        .await
        .expect("login should succeed");
    assert_eq!(root.url(), format!("{}/api/1", server.uri()));

    // Subsequent requests carry the freshly-issued token.
    let vehicles = root
        .child("vehicles")
        .get()
        .await
        .expect("request should succeed");
    assert_eq!(vehicles, json!([]));
}

#[tokio::test]
async fn rejected_login_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let error = login_with_config(&server.uri(), "elon@example.com", "wrong", TIMEOUT)
        .await
        .expect_err("login should fail");
    match error {
        TeslaApiError::Authentication { status } => assert_eq!(status, 401),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn token_body_without_access_token_fails_to_parse() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
        .mount(&server)
        .await;

    let error = login_with_config(&server.uri(), "elon@example.com", "hunter2", TIMEOUT)
        .await
        .expect_err("login should fail");
    assert!(matches!(error, TeslaApiError::Parse(_)));
}

#[tokio::test]
async fn stored_token_login_reads_the_file_and_stays_offline() {
    let server = MockServer::start().await;

    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    write!(
        file,
        r#"{{"access_token": "tokABC", "refresh_token": "ref", "created_at": 1627075200}}"#
    )
    .expect("should write token record");

    let root = stored_token_login_with_config(file.path(), &server.uri(), TIMEOUT)
        .expect("stored-token login should succeed");
    assert_eq!(root.url(), format!("{}/api/1", server.uri()));

    // Construction alone must not reach out to the API.
    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "stored-token login must stay offline");

    Mock::given(method("GET"))
        .and(path("/api/1/products"))
        .and(bearer_token("tokABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{"energy_site_id": 7}]
        })))
        .mount(&server)
        .await;

    let products = root
        .child("products")
        .get()
        .await
        .expect("request should succeed");
    assert_eq!(products[0]["energy_site_id"], json!(7));
}
