//! API types: identifiers, domain records, wire shapes and the error taxonomy.
//!
//! Wire structs mirror the server's JSON field names exactly and stay private
//! to the net layer; the panes only see the domain records.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::body::{self, Body};

// =============================================================================
// ERROR
// =============================================================================

/// Failure kinds returned by every API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Missing or rejected session token.
    #[error("unauthorized")]
    Unauthorized,

    /// The server refused a duplicate (e.g. a channel name already in use).
    #[error("conflict")]
    Conflict,

    /// Rejected on the client before any request was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("network failure: {0}")]
    Network(String),

    /// Any other non-success status.
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// A success response whose body did not match the endpoint's shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Server-assigned channel identifier. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

/// Server-assigned post identifier. Replies are posts too and share this space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ChannelId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl FromStr for MessageId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

// =============================================================================
// DOMAIN RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

/// A top-level post in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author: String,
    pub body: String,
    /// Server-reported; never incremented locally.
    pub replies_count: u64,
}

impl Message {
    #[must_use]
    pub fn body(&self) -> Body<'_> {
        body::classify(&self.body)
    }

    /// Label for the thread affordance: `Reply` or `(N) Reply`.
    #[must_use]
    pub fn reply_label(&self) -> String {
        if self.replies_count == 0 {
            "Reply".to_owned()
        } else {
            format!("({}) Reply", self.replies_count)
        }
    }
}

/// A post attached to exactly one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: MessageId,
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub author: String,
    pub body: String,
}

impl Reply {
    #[must_use]
    pub fn body(&self) -> Body<'_> {
        body::classify(&self.body)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
pub(crate) struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Deserialize)]
pub(crate) struct NewChannelResponse {
    pub channel_id: ChannelId,
    pub channel_name: String,
}

#[derive(Deserialize)]
pub(crate) struct MessageRecord {
    pub username: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub replies_count: u64,
}

#[derive(Deserialize)]
pub(crate) struct ReplyRecord {
    pub username: Option<String>,
    pub body: Option<String>,
}

/// The server answers `{}` when the same user already left this reaction.
#[derive(Deserialize)]
pub(crate) struct ReactionResponse {
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct RenameChannelRequest<'a> {
    pub channel_id: ChannelId,
    pub name: &'a str,
}

#[derive(Serialize)]
pub(crate) struct MarkReadRequest {
    pub channel_id: ChannelId,
}

#[derive(Serialize)]
pub(crate) struct PostMessageRequest<'a> {
    pub body: &'a str,
    pub channel_id: ChannelId,
}

#[derive(Serialize)]
pub(crate) struct PostReplyRequest<'a> {
    pub body: &'a str,
    pub message_id: MessageId,
    pub channel_id: ChannelId,
}

#[derive(Serialize)]
pub(crate) struct ReactionRequest<'a> {
    pub emoji: &'a str,
    pub message_id: MessageId,
}

#[derive(Serialize)]
pub(crate) struct UpdateUsernameRequest<'a> {
    #[serde(rename = "newUsername")]
    pub new_username: &'a str,
}

#[derive(Serialize)]
pub(crate) struct UpdatePasswordRequest<'a> {
    #[serde(rename = "newUserPassword")]
    pub new_user_password: &'a str,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
