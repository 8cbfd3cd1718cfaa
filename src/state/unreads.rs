//! Unread tracker: per-channel unread badges, refreshed by polling.
//!
//! Each refresh empties the counts before the response lands. Channels with
//! nothing unread are absent from the server's answer, so a full replace is
//! the only way a badge ever goes back to zero. The momentary empty state is
//! accepted.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::net::{ApiClient, ChannelId};
use crate::services::Refresh;

#[derive(Clone)]
pub struct UnreadTracker {
    api: ApiClient,
    counts: Arc<RwLock<BTreeMap<ChannelId, u64>>>,
}

impl UnreadTracker {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, counts: Arc::new(RwLock::new(BTreeMap::new())) }
    }

    /// Discard the current counts and install the server's.
    pub async fn fetch_unreads(&self) {
        self.counts.write().await.clear();
        match self.api.unread_counts().await {
            Ok(fresh) => {
                debug!(channels = fresh.len(), "unread counts refreshed");
                self.counts.write().await.extend(fresh);
            }
            Err(e) => warn!(error = %e, "unread count fetch failed"),
        }
    }

    pub async fn count(&self, channel_id: ChannelId) -> u64 {
        self.counts.read().await.get(&channel_id).copied().unwrap_or(0)
    }

    pub async fn counts(&self) -> BTreeMap<ChannelId, u64> {
        self.counts.read().await.clone()
    }

    /// Badge text, only when something is unread.
    pub async fn badge(&self, channel_id: ChannelId) -> Option<String> {
        match self.count(channel_id).await {
            0 => None,
            n => Some(format!("{n} unread message(s)")),
        }
    }
}

#[async_trait::async_trait]
impl Refresh for UnreadTracker {
    async fn refresh(&self) {
        self.fetch_unreads().await;
    }
}

#[cfg(test)]
#[path = "unreads_test.rs"]
mod tests;
