use std::time::Duration;

use reqwest::Method;
use serde_json::json;

use super::*;
use crate::net::mock::{self, MockTransport};
use crate::state::reactions::{HAPPY, SAD};
use crate::services::Mounted;

fn pane_for(mock: &std::sync::Arc<MockTransport>, channel: u64) -> MessagePane {
    MessagePane::new(mock::client(mock, Some("tok")), ChannelId(channel))
}

fn ids(messages: &[Message]) -> Vec<u64> {
    messages.iter().map(|m| m.id.0).collect()
}

// =============================================================================
// fetch_messages
// =============================================================================

#[tokio::test]
async fn second_fetch_replaces_first() {
    let mock = MockTransport::new();
    mock.respond(
        Method::GET,
        "/messages/7",
        200,
        json!({
            "1": { "username": "a", "body": "one", "replies_count": 0 },
            "2": { "username": "b", "body": "two", "replies_count": 0 }
        }),
    );
    mock.respond(
        Method::GET,
        "/messages/7",
        200,
        json!({
            "2": { "username": "b", "body": "two", "replies_count": 1 },
            "3": { "username": "c", "body": "three", "replies_count": 0 }
        }),
    );
    let pane = pane_for(&mock, 7);

    pane.fetch_messages().await;
    assert_eq!(ids(&pane.messages().await), vec![1, 2]);

    pane.fetch_messages().await;
    let messages = pane.messages().await;
    assert_eq!(ids(&messages), vec![2, 3]);
    assert_eq!(messages[0].replies_count, 1);
}

#[tokio::test]
async fn fetch_marks_channel_read_after_replacing_list() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/messages/7", 200, json!({}));
    mock.respond(Method::POST, "/unreads/update", 200, json!({}));
    let pane = pane_for(&mock, 7);

    pane.fetch_messages().await;

    assert_eq!(mock.calls(), vec!["GET /messages/7", "POST /unreads/update"]);
    assert_eq!(mock.requests()[1].body, Some(json!({ "channel_id": 7 })));
}

#[tokio::test]
async fn rejected_fetch_empties_list_and_still_marks_read() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/messages/7", 200, json!({ "1": { "username": "a", "body": "x", "replies_count": 0 } }));
    mock.respond(Method::GET, "/messages/7", 500, json!({}));
    let pane = pane_for(&mock, 7);

    pane.fetch_messages().await;
    pane.fetch_messages().await;

    assert!(pane.messages().await.is_empty());
    assert_eq!(mock.calls().last().map(String::as_str), Some("POST /unreads/update"));
}

#[tokio::test]
async fn unreachable_server_skips_read_mark() {
    let mock = MockTransport::new();
    mock.fail(Method::GET, "/messages/7", ApiError::Network("down".into()));
    let pane = pane_for(&mock, 7);

    pane.fetch_messages().await;
    assert_eq!(mock.calls(), vec!["GET /messages/7"]);
}

#[tokio::test]
async fn unreadable_list_skips_read_mark() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/messages/7", 200, json!(["not", "a", "map"]));
    mock.respond(Method::POST, "/unreads/update", 200, json!({}));
    let pane = pane_for(&mock, 7);

    pane.fetch_messages().await;

    assert!(pane.messages().await.is_empty());
    assert_eq!(mock.calls(), vec!["GET /messages/7"]);
}

// =============================================================================
// post_message
// =============================================================================

#[tokio::test]
async fn post_clears_draft_and_fetches_immediately() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/messages", 200, json!({}));
    mock.respond(Method::GET, "/messages/7", 200, json!({ "1": { "username": "a", "body": "hi", "replies_count": 0 } }));
    let pane = pane_for(&mock, 7);
    pane.set_draft("hi").await;

    pane.post_message().await.unwrap();

    assert_eq!(pane.draft().await, "");
    assert_eq!(ids(&pane.messages().await), vec![1]);
    let calls = mock.calls();
    assert_eq!(calls[0], "POST /messages");
    assert_eq!(calls[1], "GET /messages/7");
    assert_eq!(mock.requests()[0].body, Some(json!({ "body": "hi", "channel_id": 7 })));
}

#[tokio::test]
async fn failed_post_keeps_draft_and_skips_fetch() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/messages", 500, json!({}));
    let pane = pane_for(&mock, 7);
    pane.set_draft("keep me").await;

    assert_eq!(pane.post_message().await, Err(ApiError::Status { status: 500 }));
    assert_eq!(pane.draft().await, "keep me");
    assert_eq!(mock.calls(), vec!["POST /messages"]);
}

// =============================================================================
// react / tooltip
// =============================================================================

#[tokio::test]
async fn repeated_reactions_by_same_user_are_absorbed() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/reactions", 200, json!({ "user_name": "ada" }));
    let pane = pane_for(&mock, 7);

    for _ in 0..3 {
        pane.react(MessageId(1), HAPPY).await.unwrap();
    }

    assert_eq!(mock.calls().len(), 3);
    assert_eq!(pane.tooltip(MessageId(1), HAPPY).await.as_deref(), Some("ada"));
}

#[tokio::test]
async fn tooltip_lists_all_reacting_users() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/reactions", 200, json!({ "user_name": "ada" }));
    mock.respond(Method::POST, "/reactions", 200, json!({ "user_name": "bo" }));
    let pane = pane_for(&mock, 7);

    pane.react(MessageId(1), SAD).await.unwrap();
    pane.react(MessageId(1), SAD).await.unwrap();

    assert_eq!(pane.tooltip(MessageId(1), SAD).await.as_deref(), Some("ada, bo"));
    assert!(pane.tooltip(MessageId(1), HAPPY).await.is_none());
}

#[tokio::test]
async fn reaction_already_on_record_adds_nothing() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/reactions", 200, json!({}));
    let pane = pane_for(&mock, 7);

    pane.react(MessageId(1), HAPPY).await.unwrap();
    assert!(pane.snapshot().await.reactions.is_empty());
}

#[tokio::test]
async fn failed_reaction_records_nothing() {
    let mock = MockTransport::new();
    mock.respond(Method::POST, "/reactions", 403, json!({}));
    let pane = pane_for(&mock, 7);

    assert_eq!(pane.react(MessageId(1), HAPPY).await, Err(ApiError::Unauthorized));
    assert!(pane.tooltip(MessageId(1), HAPPY).await.is_none());
}

// =============================================================================
// polling
// =============================================================================

#[tokio::test(start_paused = true)]
async fn mounted_pane_polls_every_half_second() {
    let mock = MockTransport::new();
    mock.respond(Method::GET, "/messages/7", 200, json!({}));
    mock.respond(Method::POST, "/unreads/update", 200, json!({}));
    let pane = Mounted::mount(pane_for(&mock, 7), Duration::from_millis(500));

    tokio::time::sleep(Duration::from_millis(1_200)).await;
    let fetches = mock.calls().iter().filter(|c| c.as_str() == "GET /messages/7").count();
    // t = 0, 500, 1000
    assert_eq!(fetches, 3);
    assert_eq!(pane.channel_id(), ChannelId(7));
}
