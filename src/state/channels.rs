//! Channel directory and the rename form.
//!
//! DESIGN
//! ======
//! The directory is refreshed wholesale: `list` empties the local set and
//! installs the server's complete answer, so repeated listings can never
//! accumulate duplicates. Creation never inserts a placeholder; it asks the
//! server and then lists again to learn the assigned id and name.
//!
//! Selection is not tracked here. `HomeView` owns which channel is selected.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::notice::{self, FormError};
use crate::net::{ApiClient, ApiError, Channel, ChannelId};

#[derive(Clone)]
pub struct ChannelDirectory {
    api: ApiClient,
    channels: BTreeMap<ChannelId, String>,
}

impl ChannelDirectory {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, channels: BTreeMap::new() }
    }

    /// Replace the local set with the server's channel list.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`]; the local set is left empty.
    pub async fn list(&mut self) -> Result<(), ApiError> {
        self.channels.clear();
        match self.api.channels().await {
            Ok(channels) => {
                debug!(count = channels.len(), "channel list refreshed");
                self.channels = channels;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "channel list fetch failed");
                Err(e)
            }
        }
    }

    /// Ask the server for a new channel, then re-list.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from creation or from the follow-up listing.
    pub async fn create(&mut self) -> Result<(), ApiError> {
        let created = self.api.create_channel().await.inspect_err(|e| {
            warn!(error = %e, "channel create failed");
        })?;
        info!(channel_id = %created.id, name = %created.name, "channel created");
        self.list().await
    }

    /// Rename `channel_id` to `new_name`.
    ///
    /// A name held by a different channel in the known set is a
    /// [`ApiError::Conflict`] without a request; the server's own duplicate
    /// check is reported the same way.
    ///
    /// # Errors
    ///
    /// [`ApiError::Conflict`] on a duplicate name, or any other [`ApiError`].
    /// The local name is unchanged on error.
    pub async fn rename(&mut self, channel_id: ChannelId, new_name: &str) -> Result<(), ApiError> {
        let taken = self
            .channels
            .iter()
            .any(|(id, name)| *id != channel_id && name == new_name);
        if taken {
            return Err(ApiError::Conflict);
        }

        self.api.rename_channel(channel_id, new_name).await?;
        self.channels.insert(channel_id, new_name.to_owned());
        info!(%channel_id, name = %new_name, "channel renamed");
        Ok(())
    }

    /// Channels ordered by id.
    #[must_use]
    pub fn channels(&self) -> Vec<Channel> {
        self.channels
            .iter()
            .map(|(id, name)| Channel { id: *id, name: name.clone() })
            .collect()
    }

    #[must_use]
    pub fn name(&self, channel_id: ChannelId) -> Option<&str> {
        self.channels.get(&channel_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

// =============================================================================
// RENAME FORM
// =============================================================================

/// The rename page: one controlled text input for one channel.
pub struct RenameForm {
    channel_id: ChannelId,
    directory: ChannelDirectory,
    /// Current input value.
    pub name: String,
}

impl RenameForm {
    #[must_use]
    pub fn new(directory: ChannelDirectory, channel_id: ChannelId) -> Self {
        Self { channel_id, directory, name: String::new() }
    }

    #[must_use]
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.directory.name(self.channel_id)
    }

    /// Submit the input. The form stays usable after a failure.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] carrying the notice to show.
    pub async fn submit(&mut self) -> Result<(), FormError> {
        let name = self.name.clone();
        self.directory
            .rename(self.channel_id, &name)
            .await
            .map_err(|e| match e {
                ApiError::Conflict => FormError { notice: notice::CHANNEL_NAME_TAKEN, cause: e },
                other => FormError::from_api(notice::RENAME_FAILED, other),
            })
    }
}

#[cfg(test)]
#[path = "channels_test.rs"]
mod tests;
