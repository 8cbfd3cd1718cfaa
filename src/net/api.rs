//! Typed Belay API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every pane talks to the server through one shared `ApiClient`. It reads
//! the current token from the injected `SessionStore` on each call, so a
//! logout is visible to in-flight pollers on their next tick.
//!
//! ERROR HANDLING
//! ==============
//! Status codes are folded into `ApiError` here and nowhere else:
//! 401/403 are `Unauthorized`, 409 is `Conflict`, other non-2xx codes are
//! `Status`. Non-2xx bodies are never parsed as the success shape.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{ApiRequest, ApiResponse, Transport};
use super::types::{
    ApiError, ApiKeyResponse, Channel, ChannelId, MarkReadRequest, Message, MessageId, MessageRecord,
    NewChannelResponse, PostMessageRequest, PostReplyRequest, ReactionRequest, ReactionResponse, RenameChannelRequest,
    Reply, ReplyRecord, UpdatePasswordRequest, UpdateUsernameRequest,
};
use crate::session::SessionStore;

/// Whether an endpoint needs a session token before it is worth sending.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Session,
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // =========================================================================
    // AUTH & PROFILE
    // =========================================================================

    /// `POST /signup`. The server invents the user and returns its token.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn signup(&self) -> Result<String, ApiError> {
        let resp: ApiKeyResponse = self.call_json(ApiRequest::post("/signup"), Access::Public).await?;
        Ok(resp.api_key)
    }

    /// `POST /login` with credentials in headers. Bad credentials come back
    /// as 401 or 404 and are both reported as [`ApiError::Unauthorized`].
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let request = ApiRequest::post("/login")
            .header("username", username)
            .header("password", password);
        match self.call_json::<ApiKeyResponse>(request, Access::Public).await {
            Ok(resp) => Ok(resp.api_key),
            Err(ApiError::Status { status: 404 }) => Err(ApiError::Unauthorized),
            Err(e) => Err(e),
        }
    }

    /// `POST /users/name`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn update_username(&self, new_username: &str) -> Result<(), ApiError> {
        let body = encode(&UpdateUsernameRequest { new_username })?;
        self.call(ApiRequest::post("/users/name").json(body), Access::Session)
            .await
            .map(drop)
    }

    /// `POST /users/password`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn update_password(&self, new_user_password: &str) -> Result<(), ApiError> {
        let body = encode(&UpdatePasswordRequest { new_user_password })?;
        self.call(ApiRequest::post("/users/password").json(body), Access::Session)
            .await
            .map(drop)
    }

    // =========================================================================
    // CHANNELS & UNREADS
    // =========================================================================

    /// `GET /channels`: the complete channel set.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn channels(&self) -> Result<BTreeMap<ChannelId, String>, ApiError> {
        self.call_json(ApiRequest::get("/channels"), Access::Session).await
    }

    /// `POST /channels/new`. The server picks the name.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn create_channel(&self) -> Result<Channel, ApiError> {
        let resp: NewChannelResponse = self
            .call_json(ApiRequest::post("/channels/new"), Access::Session)
            .await?;
        Ok(Channel { id: resp.channel_id, name: resp.channel_name })
    }

    /// `POST /channels/rename`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Conflict`] when the name is taken, or any other [`ApiError`].
    pub async fn rename_channel(&self, channel_id: ChannelId, name: &str) -> Result<(), ApiError> {
        let body = encode(&RenameChannelRequest { channel_id, name })?;
        self.call(ApiRequest::post("/channels/rename").json(body), Access::Session)
            .await
            .map(drop)
    }

    /// `GET /unreads/count`. Channels with nothing unread are simply absent.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn unread_counts(&self) -> Result<BTreeMap<ChannelId, u64>, ApiError> {
        self.call_json(ApiRequest::get("/unreads/count"), Access::Session).await
    }

    /// `POST /unreads/update`: mark `channel_id` read for the current user.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn mark_read(&self, channel_id: ChannelId) -> Result<(), ApiError> {
        let body = encode(&MarkReadRequest { channel_id })?;
        self.call(ApiRequest::post("/unreads/update").json(body), Access::Session)
            .await
            .map(drop)
    }

    // =========================================================================
    // MESSAGES, REPLIES, REACTIONS
    // =========================================================================

    /// `GET /messages/{channel_id}`, ordered by id.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn messages(&self, channel_id: ChannelId) -> Result<Vec<Message>, ApiError> {
        let records: BTreeMap<MessageId, MessageRecord> = self
            .call_json(ApiRequest::get(format!("/messages/{channel_id}")), Access::Session)
            .await?;
        Ok(records
            .into_iter()
            .map(|(id, record)| Message {
                id,
                channel_id,
                author: record.username.unwrap_or_default(),
                body: record.body.unwrap_or_default(),
                replies_count: record.replies_count,
            })
            .collect())
    }

    /// `POST /messages`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn post_message(&self, channel_id: ChannelId, body: &str) -> Result<(), ApiError> {
        let payload = encode(&PostMessageRequest { body, channel_id })?;
        self.call(ApiRequest::post("/messages").json(payload), Access::Session)
            .await
            .map(drop)
    }

    /// `GET /replies/{message_id}`, with both ids repeated as headers because
    /// the server filters on those. Ordered by id.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn replies(&self, message_id: MessageId, channel_id: ChannelId) -> Result<Vec<Reply>, ApiError> {
        let request = ApiRequest::get(format!("/replies/{message_id}"))
            .header("message_id", message_id.to_string())
            .header("channel_id", channel_id.to_string());
        let records: BTreeMap<MessageId, ReplyRecord> = self.call_json(request, Access::Session).await?;
        Ok(records
            .into_iter()
            .map(|(id, record)| Reply {
                id,
                message_id,
                channel_id,
                author: record.username.unwrap_or_default(),
                body: record.body.unwrap_or_default(),
            })
            .collect())
    }

    /// `POST /replies`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn post_reply(&self, message_id: MessageId, channel_id: ChannelId, body: &str) -> Result<(), ApiError> {
        let payload = encode(&PostReplyRequest { body, message_id, channel_id })?;
        self.call(ApiRequest::post("/replies").json(payload), Access::Session)
            .await
            .map(drop)
    }

    /// `POST /reactions`. Returns the reacting username, or `None` when the
    /// server already had this reaction on record.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call.
    pub async fn react(&self, message_id: MessageId, emoji: &str) -> Result<Option<String>, ApiError> {
        let payload = encode(&ReactionRequest { emoji, message_id })?;
        let resp: ReactionResponse = self
            .call_json(ApiRequest::post("/reactions").json(payload), Access::Session)
            .await?;
        Ok(resp.user_name)
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    async fn call(&self, request: ApiRequest, access: Access) -> Result<String, ApiError> {
        let token = self.session.token();
        if access == Access::Session && token.is_none() {
            return Err(ApiError::Unauthorized);
        }
        let response = self.transport.send(request.token(token)).await?;
        check_status(response)
    }

    async fn call_json<T: DeserializeOwned>(&self, request: ApiRequest, access: Access) -> Result<T, ApiError> {
        let body = self.call(request, access).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn check_status(response: ApiResponse) -> Result<String, ApiError> {
    match response.status {
        200..=299 => Ok(response.body),
        401 | 403 => Err(ApiError::Unauthorized),
        409 => Err(ApiError::Conflict),
        status => Err(ApiError::Status { status }),
    }
}

fn encode<T: Serialize>(body: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Validation(e.to_string()))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
