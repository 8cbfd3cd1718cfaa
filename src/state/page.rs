//! Page controller: the top-level navigation state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! The one owner of whichever page is showing. Every page change goes
//! through here, and a page that is left is dropped: leaving the home page
//! drops the `HomeView` and with it every running poll task.
//!
//! ```text
//!              login / signup ok
//!   LoggedOut ───────────────────► Home ◄──────────────┐
//!       ▲                          │  │                │ close / submit ok / cancel
//!       │ logout (any page)        │  └─► Profile ─────┤
//!       └──────────────────────────┘  └─► RenameChannel┘
//! ```
//!
//! TRADE-OFFS
//! ==========
//! A token the server stops accepting does not by itself force a logout;
//! pollers only log it. `sync_session` lets the caller drop to `LoggedOut`
//! once the token is gone from the session store.

use tracing::info;

use super::auth;
use super::channels::RenameForm;
use super::home::HomeView;
use super::notice::FormError;
use super::profile::ProfileForm;
use crate::config::PollIntervals;
use crate::net::{ApiClient, ChannelId};

/// Which page is showing, without its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    LoggedOut,
    Home,
    Profile,
    RenameChannel(ChannelId),
}

pub enum Page {
    LoggedOut,
    Home(HomeView),
    Profile(ProfileForm),
    RenameChannel(RenameForm),
}

impl Page {
    #[must_use]
    pub fn route(&self) -> Route {
        match self {
            Self::LoggedOut => Route::LoggedOut,
            Self::Home(_) => Route::Home,
            Self::Profile(_) => Route::Profile,
            Self::RenameChannel(form) => Route::RenameChannel(form.channel_id()),
        }
    }
}

pub struct PageController {
    api: ApiClient,
    intervals: PollIntervals,
    page: Page,
}

impl PageController {
    /// Open on the home page when a session token is already stored,
    /// otherwise on the logged-out page.
    pub async fn start(api: ApiClient, intervals: PollIntervals) -> Self {
        let mut controller = Self { api, intervals, page: Page::LoggedOut };
        if controller.api.session().is_authenticated() {
            controller.go_home().await;
        }
        info!(route = ?controller.route(), "page controller started");
        controller
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.page.route()
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn home(&self) -> Option<&HomeView> {
        match &self.page {
            Page::Home(home) => Some(home),
            _ => None,
        }
    }

    pub fn home_mut(&mut self) -> Option<&mut HomeView> {
        match &mut self.page {
            Page::Home(home) => Some(home),
            _ => None,
        }
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// # Errors
    ///
    /// Returns a [`FormError`]; the page stays `LoggedOut`.
    pub async fn signup(&mut self) -> Result<(), FormError> {
        auth::signup(&self.api).await?;
        self.go_home().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a [`FormError`]; the page stays `LoggedOut`.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), FormError> {
        auth::login(&self.api, username, password).await?;
        self.go_home().await;
        Ok(())
    }

    /// Clear the session, then leave whatever page is showing.
    pub fn logout(&mut self) {
        auth::logout(&self.api);
        self.transition(Page::LoggedOut);
    }

    /// Drop to `LoggedOut` if the session token has disappeared.
    /// Returns `true` when that happened.
    pub fn sync_session(&mut self) -> bool {
        if self.api.session().is_authenticated() || self.page.route() == Route::LoggedOut {
            return false;
        }
        self.transition(Page::LoggedOut);
        true
    }

    // =========================================================================
    // PROFILE
    // =========================================================================

    /// Leave the home page for the profile form. Ignored unless the home
    /// page is showing.
    pub fn view_profile(&mut self) {
        if self.home().is_none() {
            return;
        }
        self.transition(Page::Profile(ProfileForm::new(self.api.clone())));
    }

    pub fn profile_mut(&mut self) -> Option<&mut ProfileForm> {
        match &mut self.page {
            Page::Profile(form) => Some(form),
            _ => None,
        }
    }

    pub async fn close_profile(&mut self) {
        if matches!(self.page, Page::Profile(_)) {
            self.go_home().await;
        }
    }

    // =========================================================================
    // RENAME
    // =========================================================================

    /// Leave the home page for the rename form of `channel_id`. Ignored
    /// unless the home page is showing.
    pub fn begin_rename(&mut self, channel_id: ChannelId) {
        let Some(home) = self.home() else {
            return;
        };
        let form = RenameForm::new(home.directory().clone(), channel_id);
        self.transition(Page::RenameChannel(form));
    }

    pub fn rename_mut(&mut self) -> Option<&mut RenameForm> {
        match &mut self.page {
            Page::RenameChannel(form) => Some(form),
            _ => None,
        }
    }

    /// Submit `name` on the rename form. Success returns home; failure
    /// leaves the form showing.
    ///
    /// # Errors
    ///
    /// Returns the form's [`FormError`].
    pub async fn submit_rename(&mut self, name: &str) -> Result<(), FormError> {
        let Page::RenameChannel(form) = &mut self.page else {
            return Ok(());
        };
        form.name = name.to_owned();
        form.submit().await?;
        self.go_home().await;
        Ok(())
    }

    pub async fn cancel_rename(&mut self) {
        if matches!(self.page, Page::RenameChannel(_)) {
            self.go_home().await;
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Mount a fresh home view, or land on `LoggedOut` when there is no
    /// session to mount it with.
    async fn go_home(&mut self) {
        if !self.api.session().is_authenticated() {
            self.transition(Page::LoggedOut);
            return;
        }
        let from = self.page.route();
        // Old page goes first so two home views never poll at once.
        self.page = Page::LoggedOut;
        self.page = Page::Home(HomeView::mount(self.api.clone(), self.intervals).await);
        info!(?from, to = ?Route::Home, "page changed");
    }

    fn transition(&mut self, next: Page) {
        let from = self.page.route();
        let to = next.route();
        self.page = next;
        if from != to {
            info!(?from, ?to, "page changed");
        }
    }
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
