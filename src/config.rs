//! Client configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a default so the client runs against a local server with no
//! environment at all. Values that are present but malformed are rejected
//! instead of silently falling back, because a zero or garbage poll interval
//! would otherwise surface much later as a panic inside the scheduler.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".belay_session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MESSAGE_POLL_MS: u64 = 500;
pub const DEFAULT_UNREAD_POLL_MS: u64 = 1000;

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to something that is not a positive integer.
    #[error("invalid value for {var}: {value:?} (expected a positive integer)")]
    Invalid { var: &'static str, value: String },
}

/// Request timeouts for the HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Poll cadence for the mounted panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Message pane and reply thread refresh period.
    pub messages: Duration,
    /// Unread badge refresh period.
    pub unreads: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            messages: Duration::from_millis(DEFAULT_MESSAGE_POLL_MS),
            unreads: Duration::from_millis(DEFAULT_UNREAD_POLL_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
    pub poll: PollIntervals,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeouts: Timeouts::default(),
            poll: PollIntervals::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BELAY_BASE_URL`: API root including the `/api` prefix
    /// - `BELAY_SESSION_FILE`: where the session token is persisted
    /// - `BELAY_REQUEST_TIMEOUT_SECS`: default 10
    /// - `BELAY_CONNECT_TIMEOUT_SECS`: default 5
    /// - `BELAY_MESSAGE_POLL_MS`: default 500
    /// - `BELAY_UNREAD_POLL_MS`: default 1000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable is set but is
    /// not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("BELAY_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let session_file = lookup("BELAY_SESSION_FILE").map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let timeouts = Timeouts {
            request_secs: positive(&lookup, "BELAY_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: positive(&lookup, "BELAY_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let poll = PollIntervals {
            messages: Duration::from_millis(positive(&lookup, "BELAY_MESSAGE_POLL_MS", DEFAULT_MESSAGE_POLL_MS)?),
            unreads: Duration::from_millis(positive(&lookup, "BELAY_UNREAD_POLL_MS", DEFAULT_UNREAD_POLL_MS)?),
        };

        Ok(Self { base_url, session_file, timeouts, poll })
    }
}

fn positive<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
