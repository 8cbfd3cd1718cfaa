//! Networking: the transport seam and the typed API client on top of it.

pub mod api;
#[cfg(test)]
pub(crate) mod mock;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use types::{ApiError, Channel, ChannelId, Message, MessageId, Reply};
