//! Belay client synchronization core.
//!
//! SYSTEM CONTEXT
//! ==============
//! The Belay server exposes a plain REST API with no push channel. This crate
//! keeps local view state (channels, unread badges, message and reply lists,
//! reaction tooltips) converged with that server by fixed-interval polling,
//! and drives the page-level navigation that decides which panes are mounted.
//!
//! LAYERS
//! ======
//! - `session`: the persisted auth token and its change subscription.
//! - `net`: typed endpoint calls over a swappable `Transport`.
//! - `services`: the lifecycle-bound poll scheduler.
//! - `state`: panes and the page controller built on the layers above.

pub mod config;
pub mod net;
pub mod services;
pub mod session;
pub mod state;
pub mod util;
