//! Message pane: the message list of one selected channel.
//!
//! DESIGN
//! ======
//! Keyed by channel id. The home view builds a new pane (and a new poll task)
//! whenever the selected channel changes, so a pane never switches channels.
//!
//! A fetch clears the list, installs the server's complete answer and then
//! marks the channel read. Posting never inserts locally; a successful post
//! triggers an immediate fetch instead of waiting for the next tick.
//!
//! The input is controlled state held here (`draft`), not read back from
//! whatever renders it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::reactions::ReactionAggregator;
use crate::net::{ApiClient, ApiError, ChannelId, Message, MessageId};
use crate::services::Refresh;

#[derive(Clone, Debug, Default)]
pub struct MessageListState {
    /// Ordered by id.
    pub messages: Vec<Message>,
    pub draft: String,
    pub reactions: ReactionAggregator,
}

#[derive(Clone)]
pub struct MessagePane {
    api: ApiClient,
    channel_id: ChannelId,
    state: Arc<RwLock<MessageListState>>,
}

impl MessagePane {
    #[must_use]
    pub fn new(api: ApiClient, channel_id: ChannelId) -> Self {
        Self { api, channel_id, state: Arc::new(RwLock::new(MessageListState::default())) }
    }

    #[must_use]
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub async fn snapshot(&self) -> MessageListState {
        self.state.read().await.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    pub async fn draft(&self) -> String {
        self.state.read().await.draft.clone()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.write().await.draft = text.into();
    }

    /// Replace the list with the server's and then mark the channel read.
    ///
    /// The read mark is still sent when the server rejected the fetch, but
    /// not when the server could not be reached or sent an unreadable list.
    pub async fn fetch_messages(&self) {
        let channel_id = self.channel_id;
        self.state.write().await.messages.clear();

        match self.api.messages(channel_id).await {
            Ok(messages) => {
                debug!(%channel_id, count = messages.len(), "messages refreshed");
                self.state.write().await.messages = messages;
            }
            Err(e @ (ApiError::Network(_) | ApiError::Decode(_))) => {
                warn!(%channel_id, error = %e, "message fetch failed");
                return;
            }
            Err(e) => warn!(%channel_id, error = %e, "message fetch failed"),
        }

        if let Err(e) = self.api.mark_read(channel_id).await {
            warn!(%channel_id, error = %e, "mark read failed");
        }
    }

    /// Post the draft. On success the draft is cleared and the list is
    /// fetched right away. On failure the draft is kept and the error is
    /// only logged; it is returned for callers that want it.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the post.
    pub async fn post_message(&self) -> Result<(), ApiError> {
        let body = self.draft().await;
        if let Err(e) = self.api.post_message(self.channel_id, &body).await {
            warn!(channel_id = %self.channel_id, error = %e, "message post failed");
            return Err(e);
        }
        self.state.write().await.draft.clear();
        self.fetch_messages().await;
        Ok(())
    }

    /// React to `message_id`. The reacting username from the response is
    /// added to the local aggregator at most once.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the post.
    pub async fn react(&self, message_id: MessageId, emoji: &str) -> Result<(), ApiError> {
        match self.api.react(message_id, emoji).await {
            Ok(Some(user)) => {
                self.state.write().await.reactions.add(message_id, emoji, &user);
                Ok(())
            }
            Ok(None) => {
                debug!(%message_id, "reaction already on record");
                Ok(())
            }
            Err(e) => {
                warn!(%message_id, error = %e, "reaction post failed");
                Err(e)
            }
        }
    }

    /// Hover text for `emoji` on `message_id`, if anyone reacted this session.
    pub async fn tooltip(&self, message_id: MessageId, emoji: &str) -> Option<String> {
        self.state.read().await.reactions.tooltip(message_id, emoji)
    }
}

#[async_trait::async_trait]
impl Refresh for MessagePane {
    async fn refresh(&self) {
        self.fetch_messages().await;
    }
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
