//! Resource domain types.
//!
//! These types represent cataloged tasks and pipelines, independent of any
//! infrastructure concerns (database, remote hosting API, etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Host used to build raw-content links for catalog files.
pub const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com";

// ─────────────────────────────────────────────────────────────────────────────
// Resource Kind
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of CI/CD building block a resource defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A single reusable task.
    #[default]
    Task,
    /// A pipeline composed of tasks.
    Pipeline,
}

impl ResourceKind {
    /// Storage/wire representation of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "pipeline" => Ok(Self::Pipeline),
            other => Err(format!("unknown resource kind '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GitHub Location
// ─────────────────────────────────────────────────────────────────────────────

/// Remote coordinates of a resource's files.
///
/// `(owner, repository, path)` identifies a resource: the same remote
/// definition file never maps to two catalog records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubDetails {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repository: String,
    /// Git ref the files were read at (branch, tag or commit).
    pub git_ref: String,
    /// Path of the definition file, relative to the repository root.
    pub path: String,
    /// Path of the README, or an empty string when the resource has none.
    #[serde(default)]
    pub readme_path: String,
}

impl GithubDetails {
    /// Whether a README path was recorded for this resource.
    pub fn has_readme(&self) -> bool {
        !self.readme_path.is_empty()
    }

    /// Raw-content URL for a file in this repository at the recorded ref.
    pub fn raw_url(&self, path: &str) -> String {
        format!(
            "{RAW_CONTENT_HOST}/{}/{}/{}/{}",
            self.owner,
            self.repository,
            self.git_ref,
            path.trim_start_matches('/')
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource Types
// ─────────────────────────────────────────────────────────────────────────────

/// A resource that exists in the catalog with a store-assigned ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Store-assigned identifier.
    pub id: i64,
    /// Resource name (the catalog directory name for synced resources).
    pub name: String,
    /// Human-readable description extracted from the README.
    pub description: String,
    /// Task or pipeline.
    pub kind: ResourceKind,
    /// Aggregate rating: mean of all user ratings, 0.0 when unrated.
    pub rating: f64,
    /// Number of recorded downloads.
    pub downloads: i64,
    /// Curated (`true`) versus community-submitted (`false`).
    pub verified: bool,
    /// Submitting user, `None` for resources discovered by catalog sync.
    pub user_id: Option<i64>,
    /// Where the resource's files live.
    pub github: GithubDetails,
    /// Normalized tag names.
    pub tags: Vec<String>,
    /// Normalized category names.
    pub categories: Vec<String>,
    /// Fingerprint of the remote content the record was built from.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A resource to be inserted into the catalog (no ID yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    pub name: String,
    pub description: String,
    pub kind: ResourceKind,
    pub verified: bool,
    pub user_id: Option<i64>,
    pub github: GithubDetails,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub content_hash: String,
}

/// Content fields the catalog sync may rewrite on an existing resource.
///
/// Identity, rating, download count, verification flag and submitter are
/// not part of it: a sync pass never touches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContentUpdate {
    pub description: String,
    pub git_ref: String,
    pub kind: ResourceKind,
    pub readme_path: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub content_hash: String,
}

/// A user-submitted resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSubmission {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub kind: ResourceKind,
    pub github: GithubDetails,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ResourceSubmission {
    /// Convert into an unverified catalog record.
    pub fn into_new_resource(self) -> NewResource {
        NewResource {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            kind: self.kind,
            verified: false,
            user_id: Some(self.user_id),
            github: self.github,
            tags: normalize_names(self.tags),
            categories: normalize_names(self.categories),
            content_hash: String::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query Types
// ─────────────────────────────────────────────────────────────────────────────

/// Filter for catalog queries. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceFilter {
    pub kind: Option<ResourceKind>,
    pub verified: Option<bool>,
    /// Matches resources carrying any of these tags.
    pub tags: Vec<String>,
}

impl ResourceFilter {
    #[must_use]
    pub const fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub const fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// A category together with the tags used by resources in that category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTags {
    pub name: String,
    pub tags: Vec<String>,
}

/// Raw-content links for a resource's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLinks {
    pub definition: String,
    pub readme: Option<String>,
}

impl From<&GithubDetails> for RawLinks {
    fn from(github: &GithubDetails) -> Self {
        Self {
            definition: github.raw_url(&github.path),
            readme: github
                .has_readme()
                .then(|| github.raw_url(&github.readme_path)),
        }
    }
}

/// Normalize tag or category names: trim, lower-case, drop empties, dedupe.
///
/// The result is sorted so equal sets always compare equal.
pub fn normalize_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
