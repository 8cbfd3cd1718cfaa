//! Profile page: change username or password.

use tracing::info;

use super::notice::{self, FormError};
use crate::net::{ApiClient, ApiError};

/// Controlled inputs of the profile page.
pub struct ProfileForm {
    api: ApiClient,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            username: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }

    /// Submit the username input. Clears it on success.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] carrying the notice to show.
    pub async fn update_username(&mut self) -> Result<&'static str, FormError> {
        self.api
            .update_username(&self.username)
            .await
            .map_err(|e| FormError::from_api(notice::USERNAME_FAILED, e))?;
        info!(username = %self.username, "username updated");
        self.username.clear();
        Ok(notice::USERNAME_UPDATED)
    }

    /// Submit the password inputs. Both must match; a mismatch is reported
    /// without a request. Clears both on success.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] carrying the notice to show.
    pub async fn update_password(&mut self) -> Result<&'static str, FormError> {
        if self.password != self.confirm_password {
            return Err(FormError {
                notice: notice::PASSWORDS_DIFFER,
                cause: ApiError::Validation("password confirmation does not match".into()),
            });
        }
        self.api
            .update_password(&self.password)
            .await
            .map_err(|e| FormError::from_api(notice::PASSWORD_FAILED, e))?;
        info!("password updated");
        self.password.clear();
        self.confirm_password.clear();
        Ok(notice::PASSWORD_UPDATED)
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
