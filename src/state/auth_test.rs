use reqwest::Method;
use serde_json::json;

use super::*;
use crate::net::ApiError;
use crate::net::mock::{self, MockTransport};

#[tokio::test]
async fn signup_stores_token() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/signup", 200, json!({ "api_key": "new-key" }));
    let api = mock::client(&mock, None);

    signup(&api).await.unwrap();
    assert_eq!(api.session().token().as_deref(), Some("new-key"));
}

#[tokio::test]
async fn login_stores_token() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/login", 200, json!({ "api_key": "k" }));
    let api = mock::client(&mock, None);

    login(&api, "ada", "pw").await.unwrap();
    assert_eq!(api.session().token().as_deref(), Some("k"));
}

#[tokio::test]
async fn login_bad_credentials_shows_notice_and_stays_logged_out() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/login", 401, json!({}));
    let api = mock::client(&mock, None);

    let err = login(&api, "ada", "wrong").await.unwrap_err();
    assert_eq!(err.notice, notice::BAD_CREDENTIALS);
    assert_eq!(err.cause, ApiError::Unauthorized);
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn login_network_failure_uses_unreachable_notice() {
    let mock = MockTransport::new();
    mock.fail(Method::POST, "/login", ApiError::Network("down".into()));
    let api = mock::client(&mock, None);

    let err = login(&api, "ada", "pw").await.unwrap_err();
    assert_eq!(err.notice, notice::SERVER_UNREACHABLE);
}

#[test]
fn logout_clears_token() {
    let mock = MockTransport::new();
    let api = mock::client(&mock, Some("tok"));
    logout(&api);
    assert!(api.session().token().is_none());
    assert!(mock.requests().is_empty());
}
