//! Core traits and types for the local mirror.

use chrono::{DateTime, Utc};
use color_eyre::Result;

use crate::remote::User;

/// A previously saved record set.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorSnapshot {
  /// The records in the order they were saved
  pub users: Vec<User>,
  /// When the snapshot was written
  pub saved_at: DateTime<Utc>,
}

/// Trait for mirror storage backends.
///
/// A backend holds one slot; every save overwrites it wholesale.
pub trait MirrorStorage: Send + Sync {
  /// Overwrite the slot with the full record set.
  fn save(&self, users: &[User]) -> Result<()>;

  /// Read the slot back, if anything was ever saved.
  fn load(&self) -> Result<Option<MirrorSnapshot>>;
}

/// Indicates where the records on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
  /// Nothing loaded yet
  Empty,
  /// Last list call succeeded
  Network,
  /// List call failed, serving the mirror snapshot
  Offline { saved_at: DateTime<Utc> },
}
