//! REST client behaviour shared by every endpoint

use std::sync::Arc;

use assert_matches::assert_matches;
use bizdesk::desk_app::storage::keys;
use bizdesk::desk_app::{ApiError, AuthStore, RequestOptions, Session, Storage};
use bizdesk::shared::UserInfo;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::*;

#[tokio::test]
async fn test_token_is_read_from_storage_on_every_call() {
    let api = TestApi::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("ana", "user")))
        .expect(3)
        .mount(&api.server)
        .await;

    assert_ok!(api.client.me().await);
    api.storage.set_item(keys::TOKEN, "t1").unwrap();
    assert_ok!(api.client.me().await);
    api.storage.set_item(keys::TOKEN, "t2").unwrap();
    assert_ok!(api.client.me().await);

    let headers: Vec<Option<String>> = api.requests().await.iter().map(authorization).collect();
    assert_eq!(
        headers,
        vec![None, Some("Bearer t1".to_string()), Some("Bearer t2".to_string())]
    );
}

#[tokio::test]
async fn test_error_message_prefers_error_then_detail() {
    let api = TestApi::signed_in("t").await;
    Mock::given(path("/api/reports/1/export-pdf"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad id", "detail": "ignored"})))
        .mount(&api.server)
        .await;
    Mock::given(path("/api/secure-reports/reports/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Report not found"})))
        .mount(&api.server)
        .await;
    Mock::given(path("/api/produtos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&api.server)
        .await;

    let message = assert_http_error!(api.client.export_report_pdf(1).await, 400);
    assert_eq!(message, "bad id");
    let message = assert_http_error!(api.client.get_report(2).await, 404);
    assert_eq!(message, "Report not found");
    let message = assert_http_error!(api.client.list_products().await, 500);
    assert_eq!(message, "HTTP error! status: 500");
}

#[tokio::test]
async fn test_error_body_is_kept() {
    let api = TestApi::start().await;
    Mock::given(path("/api/search/stats"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": [{"loc": ["q"]}]})))
        .mount(&api.server)
        .await;

    let result = api.client.search_stats().await;
    assert_matches!(
        result,
        Err(ApiError::Http { status: 422, ref message, body: Some(ref body) })
            if message == "HTTP error! status: 422" && body["detail"].is_array()
    );
}

#[tokio::test]
async fn test_unauthorized_answer_signs_out_through_guard() {
    let api = TestApi::start().await;
    let mut auth = AuthStore::new(api.storage.clone());
    auth.install(Session {
        token: "expired".into(),
        user: UserInfo {
            id: 1,
            username: "ana".into(),
            email: None,
            role: "user".into(),
        },
    })
    .unwrap();

    Mock::given(path("/api/secure-reports/reports"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
        .mount(&api.server)
        .await;

    let result = auth.guard(api.client.list_reports(&Default::default()).await);
    assert!(result.is_err());
    assert!(!auth.is_signed_in());
    assert_eq!(api.storage.get_item(keys::TOKEN), None);
    assert_eq!(api.storage.get_item(keys::USER), None);
}

#[tokio::test]
async fn test_empty_success_body_reads_as_null() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("DELETE"))
        .and(path("/api/test-cases/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&api.server)
        .await;

    let value = assert_ok!(api.client.delete_test_case(9).await);
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_undecodable_success_body_is_parse_error() {
    let api = TestApi::start().await;
    Mock::given(path("/api/produtos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&api.server)
        .await;

    assert_matches!(api.client.list_products().await, Err(ApiError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let storage = Arc::new(bizdesk::desk_app::MemoryStorage::new());
    let client = client_for("http://127.0.0.1:9", storage);
    let error = client.me().await.unwrap_err();
    assert_eq!(error.status(), None);
    assert!(!error.is_unauthorized());
    assert_matches!(error, ApiError::Network(_));
}

#[tokio::test]
async fn test_catalog_listing() {
    let api = TestApi::start().await;
    Mock::given(method("GET"))
        .and(path("/api/produtos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(1, "Pastilha", 10.0, 12.5),
            {"id": 2, "nome": "Filtro", "preco": 5.0}
        ])))
        .mount(&api.server)
        .await;

    let products = assert_ok!(api.client.list_products().await);
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].cart_price(), 10.0);
    assert_eq!(products[0].display_price(), 12.5);
    assert_eq!(products[1].display_price(), 5.0);
}

#[tokio::test]
async fn test_generic_request_with_query() {
    let api = TestApi::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_reports": 3})))
        .mount(&api.server)
        .await;

    let options = RequestOptions::get().with_query([("scope", "all".to_string()), ("empty", String::new())]);
    let stats: Value = assert_ok!(api.client.request("/search/stats", options).await);
    assert_eq!(stats["total_reports"], 3);

    let requests = api.requests().await;
    assert_eq!(requests[0].url.query(), Some("scope=all"));
}
