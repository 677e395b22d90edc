//! Local mirror of the last known record set.
//!
//! The mirror is a single slot overwritten with the whole set after every
//! successful remote call. It is read back only as a fallback when listing
//! from the remote fails.

mod storage;
mod traits;

pub use storage::{NoopMirror, SqliteMirror, DEFAULT_SLOT};
pub use traits::{DataSource, MirrorSnapshot, MirrorStorage};
