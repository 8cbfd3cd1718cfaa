//! User-facing notices for form submissions.
//!
//! Form failures (login, signup, rename, profile updates) are shown to the
//! user as a blocking notification. Background poll failures never are; they
//! only reach the log.

use crate::net::ApiError;

pub const BAD_CREDENTIALS: &str = "Your username or password is incorrect, please try again!";
pub const SIGNUP_FAILED: &str = "Could not create an account, please try again.";
pub const CHANNEL_NAME_TAKEN: &str = "That channel name is already taken.";
pub const RENAME_FAILED: &str = "Could not rename the channel, please try again.";
pub const USERNAME_UPDATED: &str = "Your username was successfully updated.";
pub const USERNAME_FAILED: &str = "Your username could not be updated, please try again.";
pub const PASSWORD_UPDATED: &str = "Your password was successfully updated.";
pub const PASSWORD_FAILED: &str = "Your password could not be updated, please try again.";
pub const PASSWORDS_DIFFER: &str = "Your passwords don't match, please try again!";
pub const SERVER_UNREACHABLE: &str = "Could not reach the server, please try again.";

/// A failed form submission: what to tell the user, and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{notice}")]
pub struct FormError {
    pub notice: &'static str,
    #[source]
    pub cause: ApiError,
}

impl FormError {
    /// Pick the notice for `cause`: transport failures get the generic
    /// unreachable notice, everything else gets `notice`.
    #[must_use]
    pub fn from_api(notice: &'static str, cause: ApiError) -> Self {
        let notice = match cause {
            ApiError::Network(_) => SERVER_UNREACHABLE,
            _ => notice,
        };
        Self { notice, cause }
    }
}
