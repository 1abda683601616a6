//! Session manager tests against a mock Skyward server.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use reqwest::Client;
use serde_json::json;
use skyward_client::{ClientError, Credentials, SkywardClient, XSRF_HEADER};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin() -> Credentials {
    Credentials::new("user3@example.com", "SQDJok-aUB8BfmaN")
}

fn client_for(server: &MockServer) -> SkywardClient {
    SkywardClient::with_http_client(Client::new(), &format!("{}/api", server.uri()))
}

#[tokio::test]
async fn test_authenticate_reads_token_and_csrf_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "email": "user3@example.com",
            "password": "SQDJok-aUB8BfmaN"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "jwt-1" }))
                .insert_header(XSRF_HEADER, "csrf-1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = assert_ok!(client_for(&server).authenticate(&admin()).await);

    assert_eq!(session.token(), "jwt-1");
    assert_eq!(session.csrf_token(), Some("csrf-1"));
}

#[tokio::test]
async fn test_authenticate_without_csrf_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt-1" })))
        .mount(&server)
        .await;

    let session = client_for(&server).authenticate(&admin()).await.unwrap();

    assert_eq!(session.csrf_token(), None);
}

#[tokio::test]
async fn test_invalid_credentials_surface_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Unauthorized",
            "message": "Bad credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .authenticate(&Credentials::new("user1@example.com", "wrongpassword"))
        .await
        .unwrap_err();

    match err {
        ClientError::Authentication { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_replaces_csrf_and_keeps_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "jwt-1" }))
                .insert_header(XSRF_HEADER, "csrf-1"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "jwt-2" }))
                .insert_header(XSRF_HEADER, "csrf-2"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.authenticate(&admin()).await.unwrap();
    let refreshed = client.refresh(&session).await.unwrap();

    assert_eq!(refreshed.token(), "jwt-1");
    assert_eq!(refreshed.csrf_token(), Some("csrf-2"));
    assert_eq!(refreshed.credentials(), session.credentials());
}

#[tokio::test]
async fn test_refresh_failure_is_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "jwt-1" }))
                .insert_header(XSRF_HEADER, "csrf-1"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.authenticate(&admin()).await.unwrap();
    let err = client.refresh(&session).await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Authentication { status: 503, ref message } if message == "maintenance"
    ));
}

#[tokio::test]
async fn test_session_headers_sent_on_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "jwt-1" }))
                .insert_header(XSRF_HEADER, "csrf-1"),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/42"))
        .and(header("Authorization", "Bearer jwt-1"))
        .and(header(XSRF_HEADER, "csrf-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.authenticate(&admin()).await.unwrap();
    let response = client.delete_user(&session, 42).await.unwrap();

    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Port 9 (discard) is not expected to accept HTTP connections
    let client = SkywardClient::with_http_client(Client::new(), "http://127.0.0.1:9/api");
    let err = client.authenticate(&admin()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
