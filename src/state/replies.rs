//! Reply thread: the replies under one message.
//!
//! Keyed by `(message_id, channel_id)`. Like the message pane it never
//! changes key; the home view drops it and mounts a new one instead. Reply
//! ids share the message id space, so reactions on a reply are posted with
//! the reply's id and kept in this thread's own aggregator.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::reactions::ReactionAggregator;
use crate::net::{ApiClient, ApiError, ChannelId, MessageId, Reply};
use crate::services::Refresh;

#[derive(Clone, Debug, Default)]
pub struct ReplyListState {
    /// Ordered by id.
    pub replies: Vec<Reply>,
    pub draft: String,
    pub reactions: ReactionAggregator,
}

#[derive(Clone)]
pub struct ReplyThread {
    api: ApiClient,
    message_id: MessageId,
    channel_id: ChannelId,
    state: Arc<RwLock<ReplyListState>>,
}

impl ReplyThread {
    #[must_use]
    pub fn new(api: ApiClient, message_id: MessageId, channel_id: ChannelId) -> Self {
        Self {
            api,
            message_id,
            channel_id,
            state: Arc::new(RwLock::new(ReplyListState::default())),
        }
    }

    #[must_use]
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    #[must_use]
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    #[must_use]
    pub fn key(&self) -> (MessageId, ChannelId) {
        (self.message_id, self.channel_id)
    }

    pub async fn snapshot(&self) -> ReplyListState {
        self.state.read().await.clone()
    }

    pub async fn replies(&self) -> Vec<Reply> {
        self.state.read().await.replies.clone()
    }

    pub async fn draft(&self) -> String {
        self.state.read().await.draft.clone()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.write().await.draft = text.into();
    }

    /// Replace the reply list with the server's.
    pub async fn fetch_replies(&self) {
        let message_id = self.message_id;
        self.state.write().await.replies.clear();

        match self.api.replies(message_id, self.channel_id).await {
            Ok(replies) => {
                debug!(%message_id, count = replies.len(), "replies refreshed");
                self.state.write().await.replies = replies;
            }
            Err(e) => warn!(%message_id, error = %e, "reply fetch failed"),
        }
    }

    /// Post the draft as a reply. Same contract as
    /// [`MessagePane::post_message`](super::MessagePane::post_message).
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the post.
    pub async fn post_reply(&self) -> Result<(), ApiError> {
        let body = self.draft().await;
        if let Err(e) = self.api.post_reply(self.message_id, self.channel_id, &body).await {
            warn!(message_id = %self.message_id, error = %e, "reply post failed");
            return Err(e);
        }
        self.state.write().await.draft.clear();
        self.fetch_replies().await;
        Ok(())
    }

    /// React to the reply `reply_id`.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the post.
    pub async fn react(&self, reply_id: MessageId, emoji: &str) -> Result<(), ApiError> {
        match self.api.react(reply_id, emoji).await {
            Ok(Some(user)) => {
                self.state.write().await.reactions.add(reply_id, emoji, &user);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(%reply_id, error = %e, "reaction post failed");
                Err(e)
            }
        }
    }

    pub async fn tooltip(&self, reply_id: MessageId, emoji: &str) -> Option<String> {
        self.state.read().await.reactions.tooltip(reply_id, emoji)
    }
}

#[async_trait::async_trait]
impl Refresh for ReplyThread {
    async fn refresh(&self) {
        self.fetch_replies().await;
    }
}

#[cfg(test)]
#[path = "replies_test.rs"]
mod tests;
