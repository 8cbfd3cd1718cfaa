//! Login and signup: turn a credential exchange into a stored session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page controller calls these from the logged-out page. On success the
//! token is in the `SessionStore` before the caller navigates anywhere, so
//! the first poll of the home view is already authenticated.

use tracing::{info, warn};

use super::notice::{self, FormError};
use crate::net::ApiClient;

/// Create a fresh server-generated account and start its session.
///
/// # Errors
///
/// Returns a [`FormError`] carrying the notice to show.
pub async fn signup(api: &ApiClient) -> Result<(), FormError> {
    let token = api
        .signup()
        .await
        .map_err(|e| FormError::from_api(notice::SIGNUP_FAILED, e))?;
    store(api, &token);
    info!("signed up");
    Ok(())
}

/// Exchange username and password for a session token.
///
/// # Errors
///
/// Returns a [`FormError`] carrying the notice to show.
pub async fn login(api: &ApiClient, username: &str, password: &str) -> Result<(), FormError> {
    let token = api
        .login(username, password)
        .await
        .map_err(|e| FormError::from_api(notice::BAD_CREDENTIALS, e))?;
    store(api, &token);
    info!(%username, "logged in");
    Ok(())
}

/// End the session locally. There is no server round-trip for logout.
pub fn logout(api: &ApiClient) {
    if let Err(e) = api.session().clear_token() {
        warn!(error = %e, "session token could not be removed from storage");
    }
    info!("logged out");
}

fn store(api: &ApiClient, token: &str) {
    // The in-process session is live even if persisting it fails.
    if let Err(e) = api.session().set_token(token) {
        warn!(error = %e, "session token not persisted");
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
