//! Reaction aggregator: who reacted with what, per post.
//!
//! DESIGN
//! ======
//! Purely local. Reactions are not part of the message or reply payloads, so
//! this map is only ever built from the answers to reaction posts made during
//! the pane's lifetime. A remounted pane starts empty even though the server
//! still has the reactions.

use std::collections::BTreeMap;

use crate::net::MessageId;

/// Grinning face.
pub const HAPPY: &str = "&#x1F600";
/// Neutral face.
pub const NEUTRAL: &str = "&#x1F610";
/// Slightly frowning face.
pub const SAD: &str = "&#x1F641";

/// The reactions offered on every message and reply, in display order.
pub const OFFERED: [&str; 3] = [HAPPY, NEUTRAL, SAD];

/// `post id -> emoji -> usernames`, usernames in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReactionAggregator {
    by_post: BTreeMap<MessageId, BTreeMap<String, Vec<String>>>,
}

impl ReactionAggregator {
    /// Record that `username` reacted to `post` with `emoji`.
    ///
    /// Returns `false` when the triple was already present; the state is then
    /// unchanged. Entries are never removed.
    pub fn add(&mut self, post: MessageId, emoji: &str, username: &str) -> bool {
        let users = self
            .by_post
            .entry(post)
            .or_default()
            .entry(emoji.to_owned())
            .or_default();
        if users.iter().any(|u| u == username) {
            return false;
        }
        users.push(username.to_owned());
        true
    }

    #[must_use]
    pub fn lookup(&self, post: MessageId, emoji: &str) -> Option<&[String]> {
        self.by_post
            .get(&post)
            .and_then(|emojis| emojis.get(emoji))
            .map(Vec::as_slice)
    }

    /// Hover text: the reacting usernames joined with `", "`.
    #[must_use]
    pub fn tooltip(&self, post: MessageId, emoji: &str) -> Option<String> {
        self.lookup(post, emoji).map(|users| users.join(", "))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_post.is_empty()
    }
}

#[cfg(test)]
#[path = "reactions_test.rs"]
mod tests;
