//! Integration tests for login and session handling using wiremock.
//!
//! Covers the `/token` exchange, replay of the session cookie on later
//! calls, and the guarantee that a rejected login stops the run before any
//! venue listing or AP update is attempted.

use ap_venue_move::auth::{Credentials, authenticate};
use ap_venue_move::client::MigrationClient;
use ap_venue_move::config::ApiConfig;
use ap_venue_move::error::MigrationError;
use ap_venue_move::migration::{FailurePolicy, migrate_venue};
use ap_venue_move::request::PollConfig;
use ap_venue_move::venue::list_devices_in_venue;
use reqwest::StatusCode;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANT: &str = "tenant-auth";

fn client_for(server: &MockServer) -> MigrationClient {
    let api = ApiConfig {
        host: server.uri(),
        tenant_id: TENANT.to_string(),
    };
    MigrationClient::new(&api).unwrap()
}

#[tokio::test]
async fn login_posts_credentials_and_establishes_session() {
    let server = MockServer::start().await;
    let mut client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_json(serde_json::json!({
            "username": "ops@example.com",
            "password": "s3cret",
            "region": "US"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = authenticate(&mut client, &Credentials::new("ops@example.com", "s3cret", "US"))
        .await
        .unwrap();

    assert_eq!(session.username, "ops@example.com");
    assert_eq!(session.tenant_id, TENANT);
    assert_eq!(client.session(), Some(&session));
}

#[tokio::test]
async fn session_cookie_is_sent_on_later_calls() {
    let server = MockServer::start().await;
    let mut client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "SESSION=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/tenant/{TENANT}/wifi/venue/V1/ap-group")))
        .and(header("cookie", "SESSION=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    authenticate(&mut client, &Credentials::new("ops", "pw", "US"))
        .await
        .unwrap();
    let devices = list_devices_in_venue(&client, "V1").await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn rejected_login_returns_auth_error_and_blocks_listing() {
    let server = MockServer::start().await;
    let mut client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid username or password"))
        .mount(&server)
        .await;

    // Neither listing nor updates may reach the backend after a failed login.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = authenticate(&mut client, &Credentials::new("ops", "wrong", "US"))
        .await
        .unwrap_err();
    match &err {
        MigrationError::Auth { status, body } => {
            assert_eq!(*status, StatusCode::UNAUTHORIZED);
            assert!(body.contains("Invalid username"), "body preserved, got: {body}");
        }
        other => panic!("expected Auth error, got: {other:?}"),
    }
    assert!(client.session().is_none());

    let listing = list_devices_in_venue(&client, "V1").await;
    assert!(matches!(listing, Err(MigrationError::NotAuthenticated)));

    let migration =
        migrate_venue(&client, "V1", "V2", &PollConfig::default(), FailurePolicy::Continue).await;
    assert!(matches!(migration, Err(MigrationError::NotAuthenticated)));
}

#[tokio::test]
async fn server_error_on_login_is_auth_error() {
    let server = MockServer::start().await;
    let mut client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = authenticate(&mut client, &Credentials::new("ops", "pw", "EU"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("503"), "got: {err}");
    assert!(err.to_string().contains("maintenance"), "got: {err}");
}
