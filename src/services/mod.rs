//! Background services.

pub mod poller;

pub use poller::{Mounted, PollHandle, Refresh};
