//! Integration tests for the wallet resolver against a mock wallet server.

use openpay_lib::directory::MemoryAliasDirectory;
use openpay_lib::{AliasDirectory, OpenpayError, SendRequest, WalletResolver};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn resolver_for(server: &MockServer, timeout: Duration) -> WalletResolver {
    let alice = format!("{}/alice", server.uri());
    let bob = format!("{}/bob", server.uri());
    let directory = Arc::new(MemoryAliasDirectory::with_records(&[
        ("alice_wallet", alice.as_str()),
        ("bob_store", bob.as_str()),
    ]));
    WalletResolver::new(directory, timeout).unwrap()
}

#[tokio::test]
async fn test_resolve_returns_remote_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "https://wallet.example.test/alice",
            "publicName": "Alice",
            "assetCode": "USD",
            "assetScale": 2,
            "authServer": "https://auth.example.test",
            "resourceServer": "https://rs.example.test"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Duration::from_secs(5));
    let wallet = resolver.resolve("alice_wallet").await.unwrap();

    assert_eq!(wallet.public_name, "alice_wallet");
    assert_eq!(wallet.wallet_url, format!("{}/alice", server.uri()));
    assert_eq!(wallet.asset_code.as_deref(), Some("USD"));
    assert_eq!(wallet.asset_scale, Some(2));
    assert_eq!(wallet.auth_server.as_deref(), Some("https://auth.example.test"));
}

#[tokio::test]
async fn test_absent_fields_stay_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"assetCode": "EUR"})))
        .mount(&server)
        .await;

    let wallet = resolver_for(&server, Duration::from_secs(5))
        .resolve("alice_wallet")
        .await
        .unwrap();
    assert_eq!(wallet.asset_code.as_deref(), Some("EUR"));
    assert_eq!(wallet.asset_scale, None);
    assert_eq!(wallet.id, None);
}

#[tokio::test]
async fn test_unknown_alias_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = resolver_for(&server, Duration::from_secs(5))
        .resolve("ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, OpenpayError::AliasNotFound(_)));
}

#[tokio::test]
async fn test_error_status_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = resolver_for(&server, Duration::from_secs(5))
        .resolve("alice_wallet")
        .await
        .unwrap_err();
    match err {
        OpenpayError::WalletFetchFailed { endpoint, reason } => {
            assert!(endpoint.ends_with("/alice"));
            assert!(reason.contains("503"), "reason: {}", reason);
        }
        other => panic!("expected WalletFetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = resolver_for(&server, Duration::from_secs(5))
        .resolve("alice_wallet")
        .await
        .unwrap_err();
    assert!(matches!(err, OpenpayError::WalletFetchFailed { .. }));
}

#[tokio::test]
async fn test_slow_wallet_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"assetCode": "USD"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = resolver_for(&server, Duration::from_millis(300))
        .resolve("alice_wallet")
        .await
        .unwrap_err();
    assert!(matches!(err, OpenpayError::WalletFetchFailed { .. }));
}

#[tokio::test]
async fn test_send_with_recipient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"assetCode": "USD", "assetScale": 2})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/carol"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"publicName": "Carol", "assetCode": "USD", "assetScale": 2})),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server, Duration::from_secs(5));
    let request =
        SendRequest::new("alice_wallet", 12.5).with_recipient(format!("{}/carol", server.uri()));
    let receipt = resolver.send(&request).await.unwrap();

    assert_eq!(receipt.status, "initiated");
    assert_eq!(receipt.sender.public_name, "alice_wallet");
    assert_eq!(receipt.amount_in_base_units, Some(1250));
    let recipient = receipt.recipient.unwrap();
    assert_eq!(recipient.public_name, "Carol");

    // the directory is read, never written
    assert_eq!(resolver.directory().list_all().unwrap().len(), 2);
}

#[tokio::test]
async fn test_send_fails_when_recipient_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"assetCode": "USD"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/carol"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let request = SendRequest::new("alice_wallet", 1.0)
        .with_recipient(format!("{}/carol", server.uri()));
    let err = resolver_for(&server, Duration::from_secs(5))
        .send(&request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OpenpayError::WalletFetchFailed { ref endpoint, .. } if endpoint.ends_with("/carol")
    ));
}
