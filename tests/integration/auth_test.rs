//! Sign-in and session restore against the mock API

use assert_matches::assert_matches;
use bizdesk::desk_app::storage::keys;
use bizdesk::desk_app::{restore_session, sign_in, AuthError, AuthStore, Storage};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::*;

async fn mount_login(api: &TestApi, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "bearer"
        })))
        .mount(&api.server)
        .await;
}

#[tokio::test]
async fn test_sign_in_persists_token_and_profile() {
    let api = TestApi::start().await;
    mount_login(&api, "abc").await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("ana", "admin")))
        .expect(1)
        .mount(&api.server)
        .await;

    let session = assert_ok!(sign_in(&api.client, api.storage.as_ref(), "  ana ", "secret").await);
    assert_eq!(session.token, "abc");
    assert_eq!(session.user.username, "ana");
    assert!(session.user.is_admin());

    assert_eq!(api.storage.get_item(keys::TOKEN).as_deref(), Some("abc"));
    let cached = api.storage.get_item(keys::USER).unwrap_or_default();
    assert_contains!(cached, "\"username\":\"ana\"");

    let requests = api.requests().await;
    let login_body = body_text(&requests[0]);
    assert_contains!(login_body, "username=ana");
    assert_contains!(login_body, "password=secret");

    // a fresh store picks the persisted session up
    let store = AuthStore::new(api.storage.clone());
    assert!(store.is_signed_in());
    assert_eq!(store.user().map(|u| u.username.as_str()), Some("ana"));
}

#[tokio::test]
async fn test_blank_credentials_never_reach_the_server() {
    let api = TestApi::start().await;

    let result = sign_in(&api.client, api.storage.as_ref(), "   ", "secret").await;
    assert_matches!(result, Err(AuthError::Validation(_)));
    let result = sign_in(&api.client, api.storage.as_ref(), "ana", "").await;
    assert_matches!(result, Err(AuthError::Validation(_)));

    assert!(api.requests().await.is_empty());
}

#[tokio::test]
async fn test_rejected_credentials_are_not_persisted() {
    let api = TestApi::start().await;
    Mock::given(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&api.server)
        .await;

    let error = sign_in(&api.client, api.storage.as_ref(), "ana", "wrong")
        .await
        .unwrap_err();
    assert_matches!(error, AuthError::Api(ref e) if e.is_unauthorized());
    assert_eq!(error.user_message(), "Login failed. Check your credentials.");
    assert_eq!(api.storage.get_item(keys::TOKEN), None);
}

#[tokio::test]
async fn test_profile_failure_after_login_clears_token() {
    let api = TestApi::start().await;
    mount_login(&api, "abc").await;
    Mock::given(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api.server)
        .await;

    let result = sign_in(&api.client, api.storage.as_ref(), "ana", "secret").await;
    assert_matches!(result, Err(AuthError::Api(_)));
    assert_eq!(api.storage.get_item(keys::TOKEN), None);
    assert_eq!(api.storage.get_item(keys::USER), None);
}

#[tokio::test]
async fn test_restore_without_token_makes_no_request() {
    let api = TestApi::start().await;

    let restored = assert_ok!(restore_session(&api.client, api.storage.as_ref()).await);
    assert!(restored.is_none());
    assert!(api.requests().await.is_empty());
}

#[tokio::test]
async fn test_restore_with_invalid_token_clears_storage() {
    let api = TestApi::signed_in("stale").await;
    api.storage
        .set_item(keys::USER, &user_json("ana", "user").to_string())
        .unwrap();
    Mock::given(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})))
        .expect(1)
        .mount(&api.server)
        .await;

    let restored = assert_ok!(restore_session(&api.client, api.storage.as_ref()).await);
    assert!(restored.is_none());
    assert_eq!(api.storage.get_item(keys::TOKEN), None);
    assert_eq!(api.storage.get_item(keys::USER), None);
}

#[tokio::test]
async fn test_restore_refreshes_cached_profile() {
    let api = TestApi::signed_in("good").await;
    api.storage
        .set_item(keys::USER, &user_json("old-name", "user").to_string())
        .unwrap();
    Mock::given(path("/api/auth/me"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("ana", "admin")))
        .mount(&api.server)
        .await;

    let session = assert_ok!(restore_session(&api.client, api.storage.as_ref()).await)
        .expect("valid token restores a session");
    assert_eq!(session.token, "good");
    assert_eq!(session.user.username, "ana");

    let cached = api.storage.get_item(keys::USER).unwrap_or_default();
    assert_contains!(cached, "\"username\":\"ana\"");
}
