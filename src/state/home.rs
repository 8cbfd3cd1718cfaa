//! Home view: channel list, unread badges, and the open message pane and
//! reply thread.
//!
//! SYSTEM CONTEXT
//! ==============
//! Exists only while the page controller is on the home page. Dropping it
//! drops every `Mounted` pane it holds, which aborts their poll tasks; that is
//! the whole of "unmount".
//!
//! DESIGN
//! ======
//! Selection lives here, not in the directory. Panes are keyed: a different
//! channel or a different thread never reuses a pane, it drops the old one
//! and mounts a fresh one with its own poll task and empty reaction state.

use tracing::{debug, info};

use super::channels::ChannelDirectory;
use super::messages::MessagePane;
use super::replies::ReplyThread;
use super::unreads::UnreadTracker;
use crate::config::PollIntervals;
use crate::net::{ApiClient, ApiError, ChannelId, MessageId};
use crate::services::Mounted;

pub struct HomeView {
    api: ApiClient,
    intervals: PollIntervals,
    directory: ChannelDirectory,
    unreads: Mounted<UnreadTracker>,
    selected: Option<ChannelId>,
    highlighted: Option<ChannelId>,
    messages: Option<Mounted<MessagePane>>,
    thread: Option<Mounted<ReplyThread>>,
}

impl HomeView {
    /// Mount the home view: start the unread poll and list channels once.
    /// A failed listing leaves the directory empty and is only logged.
    pub async fn mount(api: ApiClient, intervals: PollIntervals) -> Self {
        let unreads = Mounted::mount(UnreadTracker::new(api.clone()), intervals.unreads);
        let mut directory = ChannelDirectory::new(api.clone());
        // Failure is already logged by the directory.
        let _ = directory.list().await;

        Self {
            api,
            intervals,
            directory,
            unreads,
            selected: None,
            highlighted: None,
            messages: None,
            thread: None,
        }
    }

    // =========================================================================
    // CHANNELS
    // =========================================================================

    /// Channel click. Clicking the selected channel deselects it; clicking
    /// another selects it. Either way the previous pane and thread go away.
    pub fn select_channel(&mut self, channel_id: ChannelId) {
        self.thread = None;
        self.messages = None;

        if self.selected == Some(channel_id) {
            debug!(%channel_id, "channel deselected");
            self.selected = None;
            self.highlighted = None;
            return;
        }

        debug!(%channel_id, "channel selected");
        self.selected = Some(channel_id);
        self.highlighted = Some(channel_id);
        let pane = MessagePane::new(self.api.clone(), channel_id);
        self.messages = Some(Mounted::mount(pane, self.intervals.messages));
    }

    /// Create a channel and re-list.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`]; the failure is logged by the directory.
    pub async fn create_channel(&mut self) -> Result<(), ApiError> {
        self.directory.create().await
    }

    #[must_use]
    pub fn directory(&self) -> &ChannelDirectory {
        &self.directory
    }

    #[must_use]
    pub fn unreads(&self) -> &UnreadTracker {
        &self.unreads
    }

    #[must_use]
    pub fn selected(&self) -> Option<ChannelId> {
        self.selected
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<ChannelId> {
        self.highlighted
    }

    // =========================================================================
    // PANES
    // =========================================================================

    #[must_use]
    pub fn messages(&self) -> Option<&MessagePane> {
        self.messages.as_deref()
    }

    #[must_use]
    pub fn thread(&self) -> Option<&ReplyThread> {
        self.thread.as_deref()
    }

    /// Close the message pane. The thread goes with it and the highlight is
    /// cleared, but the channel stays selected: clicking it again deselects.
    pub fn close_messages(&mut self) {
        self.thread = None;
        self.messages = None;
        self.highlighted = None;
    }

    /// Open the reply thread of `message_id` in the open pane's channel.
    /// Returns `false` when no pane is open. Re-opening the thread that is
    /// already open keeps it mounted.
    pub fn open_thread(&mut self, message_id: MessageId) -> bool {
        let Some(channel_id) = self.messages.as_ref().map(|pane| pane.channel_id()) else {
            return false;
        };
        if self.thread.as_ref().is_some_and(|t| t.key() == (message_id, channel_id)) {
            return true;
        }

        info!(%message_id, %channel_id, "thread opened");
        let thread = ReplyThread::new(self.api.clone(), message_id, channel_id);
        self.thread = Some(Mounted::mount(thread, self.intervals.messages));
        true
    }

    pub fn close_thread(&mut self) {
        self.thread = None;
    }
}

#[cfg(test)]
#[path = "home_test.rs"]
mod tests;
