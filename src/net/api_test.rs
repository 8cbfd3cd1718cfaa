use reqwest::Method;
use serde_json::json;

use super::*;
use crate::net::mock::{self, MockTransport};

// =============================================================
// check_status
// =============================================================

fn response(status: u16) -> ApiResponse {
    ApiResponse { status, body: "{}".into() }
}

#[test]
fn check_status_maps_success_body_through() {
    assert_eq!(check_status(response(200)).unwrap(), "{}");
}

#[test]
fn check_status_maps_auth_failures() {
    assert_eq!(check_status(response(401)), Err(ApiError::Unauthorized));
    assert_eq!(check_status(response(403)), Err(ApiError::Unauthorized));
}

#[test]
fn check_status_maps_conflict_and_others() {
    assert_eq!(check_status(response(409)), Err(ApiError::Conflict));
    assert_eq!(check_status(response(500)), Err(ApiError::Status { status: 500 }));
}

// =============================================================
// Token handling
// =============================================================

#[tokio::test]
async fn session_endpoints_without_token_never_hit_the_network() {
    let mock = MockTransport::new();
    let api = mock::client(&mock, None);

    assert_eq!(api.channels().await, Err(ApiError::Unauthorized));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn token_is_attached_to_every_request() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/channels", 200, json!({}));
    let api = mock::client(&mock, Some("tok-1"));

    api.channels().await.unwrap();
    assert_eq!(mock.requests()[0].token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn error_body_is_not_parsed_as_success_shape() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/unreads/count", 500, json!({ "oops": true }));
    let api = mock::client(&mock, Some("tok"));

    assert_eq!(api.unread_counts().await, Err(ApiError::Status { status: 500 }));
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/channels", 200, json!([1, 2, 3]));
    let api = mock::client(&mock, Some("tok"));

    assert!(matches!(api.channels().await, Err(ApiError::Decode(_))));
}

// =============================================================
// Auth
// =============================================================

#[tokio::test]
async fn signup_returns_api_key() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/signup", 200, json!({ "api_key": "fresh" }));
    let api = mock::client(&mock, None);

    assert_eq!(api.signup().await.unwrap(), "fresh");
}

#[tokio::test]
async fn login_sends_credentials_as_headers() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/login", 200, json!({ "api_key": "k" }));
    let api = mock::client(&mock, None);

    assert_eq!(api.login("ada", "pw").await.unwrap(), "k");
    let sent = &mock.requests()[0];
    assert!(sent.headers.contains(&("username", "ada".to_owned())));
    assert!(sent.headers.contains(&("password", "pw".to_owned())));
    assert!(sent.body.is_none());
}

#[tokio::test]
async fn login_unknown_user_is_unauthorized() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/login", 404, json!({}));
    let api = mock::client(&mock, None);

    assert_eq!(api.login("ghost", "pw").await, Err(ApiError::Unauthorized));
}

// =============================================================
// Channels
// =============================================================

#[tokio::test]
async fn create_channel_maps_response() {
    let mock = MockTransport::new();
    mock.respond(
        Method::POST,
        "/channels/new",
        200,
        json!({ "channel_id": 4, "channel_name": "Unnamed Channel 123456" }),
    );
    let api = mock::client(&mock, Some("tok"));

    let channel = api.create_channel().await.unwrap();
    assert_eq!(channel, Channel { id: ChannelId(4), name: "Unnamed Channel 123456".into() });
}

#[tokio::test]
async fn rename_channel_conflict() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/channels/rename", 409, json!({}));
    let api = mock::client(&mock, Some("tok"));

    assert_eq!(api.rename_channel(ChannelId(3), "taken").await, Err(ApiError::Conflict));
    assert_eq!(mock.requests()[0].body, Some(json!({ "channel_id": 3, "name": "taken" })));
}

// =============================================================
// Messages & replies
// =============================================================

#[tokio::test]
async fn messages_are_ordered_by_id() {
    let mock = MockTransport::new();
    mock.respond(
        Method::GET,
        "/messages/7",
        200,
        json!({
            "12": { "username": "bo", "body": "second", "replies_count": 0 },
            "3": { "username": "al", "body": "first", "replies_count": 2 }
        }),
    );
    let api = mock::client(&mock, Some("tok"));

    let messages = api.messages(ChannelId(7)).await.unwrap();
    let ids: Vec<_> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![MessageId(3), MessageId(12)]);
    assert_eq!(messages[0].replies_count, 2);
    assert_eq!(messages[0].channel_id, ChannelId(7));
}

#[tokio::test]
async fn replies_pass_ids_as_metadata_headers() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/replies/5", 200, json!({ "9": { "username": "cy", "body": "re" } }));
    let api = mock::client(&mock, Some("tok"));

    let replies = api.replies(MessageId(5), ChannelId(2)).await.unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].message_id, MessageId(5));

    let sent = &mock.requests()[0];
    assert!(sent.headers.contains(&("message_id", "5".to_owned())));
    assert!(sent.headers.contains(&("channel_id", "2".to_owned())));
}

#[tokio::test]
async fn react_returns_reacting_user_or_none() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/reactions", 200, json!({ "user_name": "ada" }));
    mock.respond(Method::POST, "/reactions", 200, json!({}));
    let api = mock::client(&mock, Some("tok"));

    assert_eq!(api.react(MessageId(1), "&#x1F600").await.unwrap().as_deref(), Some("ada"));
    assert_eq!(api.react(MessageId(1), "&#x1F600").await.unwrap(), None);
}

#[tokio::test]
async fn network_failure_propagates() {
    let mock = MockTransport::new();
    mock.fail(Method::POST, "/messages", ApiError::Network("connection refused".into()));
    let api = mock::client(&mock, Some("tok"));

    assert!(matches!(api.post_message(ChannelId(1), "hi").await, Err(ApiError::Network(_))));
}
