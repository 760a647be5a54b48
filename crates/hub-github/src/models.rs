//! Internal response types for the GitHub contents API.
//!
//! These types are internal to `hub-github`. Consumers see the core
//! `RemoteEntry` instead.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hub_core::{EntryKind, RemoteEntry};
use serde::Deserialize;

use crate::error::{GithubError, GithubResult};

/// One element of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    /// `file`, `dir`, `symlink` or `submodule`
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl From<ContentEntry> for RemoteEntry {
    fn from(entry: ContentEntry) -> Self {
        let kind = if entry.entry_type == "dir" {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        Self {
            name: entry.name,
            path: entry.path,
            kind,
        }
    }
}

/// Body of a single-file response.
#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

impl FileContent {
    /// Decode the embedded content to UTF-8 text.
    ///
    /// GitHub wraps base64 content at 60 columns, so whitespace is stripped
    /// before decoding. Files over 1 MB come back with encoding `none` and
    /// no content.
    pub fn decode(self) -> GithubResult<String> {
        if self.encoding != "base64" {
            return Err(GithubError::InvalidResponse {
                message: format!("unsupported content encoding '{}'", self.encoding),
            });
        }

        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD.decode(compact)?;
        Ok(String::from_utf8(bytes)?)
    }
}
