//! HTTP authority gateway against a mock authority

use std::sync::Arc;

use auth::config::{AuthConfig, StorageKeys};
use auth::domain::repository::AuthorityGateway;
use auth::models::{Email, SubscriptionTier};
use auth::{AuthError, HttpAuthorityGateway, IdentityContext, SessionGate, StorageCredentialStore};
use platform::http::HttpConfig;
use platform::location::{AddressBar, MemoryAddressBar};
use platform::storage::MemoryStorage;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> HttpAuthorityGateway {
    let base = Url::parse(&server.uri()).unwrap();
    HttpAuthorityGateway::new(&HttpConfig::new(base)).unwrap()
}

fn email(raw: &str) -> Email {
    Email::new(raw).unwrap()
}

#[tokio::test]
async fn test_check_session_posts_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/check"))
        .and(body_json(json!({ "email": "a@x.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "authenticated": true,
            "is_paid": true,
            "subscription_status": "paid",
            "name": "A"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let check = gateway(&server).check_session(&email("A@X.com")).await.unwrap();

    assert!(check.is_active());
    assert_eq!(check.name.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_check_session_honours_disowned_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "authenticated": false,
            "is_paid": true,
            "subscription_status": "paid"
        })))
        .mount(&server)
        .await;

    let check = gateway(&server).check_session(&email("a@x.com")).await.unwrap();

    assert_eq!(check.authenticated, Some(false));
    assert!(!check.is_active());
}

#[tokio::test]
async fn test_magic_link_dev_token_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/magic-link"))
        .and(body_json(json!({ "email": "a@x.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Magic link sent",
            "dev_token": "dev-123"
        })))
        .mount(&server)
        .await;

    let sent = gateway(&server)
        .request_magic_link(&email("a@x.com"))
        .await
        .unwrap();

    assert!(sent.success);
    assert_eq!(sent.dev_token.as_deref(), Some("dev-123"));
}

#[tokio::test]
async fn test_rejection_with_json_body_is_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-token"))
        .and(body_json(json!({ "token": "used" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "is_paid": null,
            "error": "Token already used"
        })))
        .mount(&server)
        .await;

    let answer = gateway(&server).verify_token("used").await.unwrap();

    assert!(!answer.success);
    assert!(!answer.is_paid);
    assert_eq!(answer.error.as_deref(), Some("Token already used"));
}

#[tokio::test]
async fn test_non_json_failure_is_unexpected_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/check"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .check_session(&email("a@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_authority_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let gateway = HttpAuthorityGateway::new(&HttpConfig::new(base)).unwrap();

    let err = gateway.check_session(&email("a@x.com")).await.unwrap_err();

    assert!(matches!(err, AuthError::Network(_)));
}

#[tokio::test]
async fn test_logout_ignores_answer_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).logout().await.unwrap();
}

#[tokio::test]
async fn test_base_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let gateway = HttpAuthorityGateway::new(&HttpConfig::new(base)).unwrap();
    gateway.logout().await.unwrap();
}

#[tokio::test]
async fn test_magic_link_round_trip_through_gate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-token"))
        .and(body_json(json!({ "token": "abc123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "is_paid": true,
            "session_token": "s1",
            "email": "a@x.com",
            "name": "A"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/mandates"))
        .and(header("x-user-email", "a@x.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = AuthConfig {
        api_base_url: Url::parse(&server.uri()).unwrap(),
        ..Default::default()
    };
    let storage = Arc::new(MemoryStorage::new());
    let store = Arc::new(StorageCredentialStore::new(
        storage.clone(),
        StorageKeys::default(),
    ));
    let context = IdentityContext::new(store);
    let bar = Arc::new(MemoryAddressBar::parse("https://app.example.com/dashboard?token=abc123").unwrap());
    let gateway = Arc::new(HttpAuthorityGateway::new(&config.http_config()).unwrap());
    let gate = SessionGate::new(gateway, context.clone(), bar.clone(), Arc::new(config));

    let state = gate.boot().await;

    assert!(state.is_authenticated());
    assert_eq!(bar.current().as_str(), "https://app.example.com/dashboard");
    assert_eq!(context.current().unwrap().tier, SubscriptionTier::Paid);
    assert_eq!(storage.snapshot()["mandate_wizard_session"], "s1");

    // Downstream calls carry the identity header
    let client = reqwest::Client::new();
    let response = context
        .attach_identity(client.get(format!("{}/api/mandates", server.uri())))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}
