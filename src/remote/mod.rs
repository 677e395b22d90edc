//! Remote store adapter for the users collection.

pub mod api_types;
pub mod client;
pub mod error;
pub mod types;

pub use client::UserClient;
pub use error::NetworkFailure;
pub use types::{PendingId, User, UserDraft, UserId};
