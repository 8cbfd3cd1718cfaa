//! View state: panes, forms and the page controller.
//!
//! DESIGN
//! ======
//! Data flows up from `ApiClient`; user actions flow down as method calls.
//! Each pane owns its list state exclusively. Panes that poll are `Clone`
//! handles over shared state so their poll task and the caller see the same
//! list; everything else is a plain struct owned by its parent.

pub mod auth;
pub mod channels;
pub mod home;
pub mod messages;
pub mod notice;
pub mod page;
pub mod profile;
pub mod reactions;
pub mod replies;
pub mod unreads;

pub use channels::{ChannelDirectory, RenameForm};
pub use home::HomeView;
pub use messages::MessagePane;
pub use notice::FormError;
pub use page::{Page, PageController, Route};
pub use profile::ProfileForm;
pub use reactions::ReactionAggregator;
pub use replies::ReplyThread;
pub use unreads::UnreadTracker;
