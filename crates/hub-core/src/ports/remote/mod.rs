//! Remote repository reader port definitions.
//!
//! This module defines the port trait and DTOs for reading a remote source
//! tree. The production implementation lives in `hub-github`.

mod error;
mod reader;
mod types;

pub use error::{RemoteError, RemoteResult};
pub use reader::RemoteRepositoryReader;
pub use types::{EntryKind, RemoteEntry, RepoCoordinates};
