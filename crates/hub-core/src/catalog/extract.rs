//! Metadata extraction for one catalog directory.
//!
//! A directory is a resource when it holds a YAML definition file. Its
//! description comes from the Markdown documentation next to it, its kind and
//! labels from the definition itself.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::retry::RetryPolicy;
use crate::domain::{
    ErrorKind, GithubDetails, NewResource, ResourceContentUpdate, ResourceKind, normalize_names,
};
use crate::ports::{CoreError, RemoteEntry, RemoteError, RemoteRepositoryReader, RepoCoordinates};

/// Annotation holding comma-separated tags.
pub const TAGS_ANNOTATION: &str = "tekton.dev/tags";

/// Annotation holding comma-separated categories.
pub const CATEGORIES_ANNOTATION: &str = "tekton.dev/categories";

/// Errors that make one directory unusable. Never fatal to a sync pass.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Invalid definition in {path}: {message}")]
    Validation { path: String, message: String },
}

impl ExtractError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Remote(err) => err.kind(),
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }
}

impl From<ExtractError> for CoreError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Remote(err) => Self::Remote(err),
            err @ ExtractError::Validation { .. } => Self::Validation(err.to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File classification
// ─────────────────────────────────────────────────────────────────────────────

/// The files of a directory that make it a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceFiles<'a> {
    pub definition: &'a RemoteEntry,
    pub readme: Option<&'a RemoteEntry>,
}

fn is_definition(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

fn is_readme(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".md")
}

/// Pick the definition and documentation files out of a directory listing.
///
/// Returns `None` when there is no definition file: the directory is not a
/// resource. When several candidates exist the first by name wins, so the
/// choice does not depend on listing order.
pub fn classify_files(entries: &[RemoteEntry]) -> Option<ResourceFiles<'_>> {
    let first_by_name = |pred: fn(&str) -> bool| {
        entries
            .iter()
            .filter(|entry| entry.is_file() && pred(&entry.name))
            .min_by(|a, b| a.name.cmp(&b.name))
    };

    let definition = first_by_name(is_definition)?;
    Some(ResourceFiles {
        definition,
        readme: first_by_name(is_readme),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Description extraction
// ─────────────────────────────────────────────────────────────────────────────

fn is_heading(line: &str) -> bool {
    line.starts_with('#')
}

/// Extract the description paragraph from Markdown documentation.
///
/// The first heading is the title; the lines up to the next heading are the
/// description. With a single heading everything after it is kept up to the
/// end of input. Without any heading the whole document is the description.
/// The result is trimmed and capped at `max_len` characters.
pub fn extract_description(content: &str, max_len: usize) -> String {
    let mut seen_heading = false;
    let mut paragraph: Vec<&str> = Vec::new();
    let mut accumulated = 0usize;

    for line in content.lines() {
        if is_heading(line) {
            if seen_heading {
                break;
            }
            seen_heading = true;
            continue;
        }
        if seen_heading {
            paragraph.push(line);
            accumulated += line.len() + 1;
            // A char is at most 4 bytes, so max_len chars are already collected.
            if accumulated > max_len.saturating_mul(4) {
                break;
            }
        }
    }

    let description = if seen_heading {
        paragraph.join("\n")
    } else {
        content.to_string()
    };

    truncate_chars(description.trim(), max_len)
}

fn truncate_chars(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Definition parsing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawDefinition {
    kind: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    name: Option<String>,
    #[serde(default)]
    annotations: BTreeMap<String, serde_yaml::Value>,
}

/// Fields read from a definition document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionMetadata {
    pub kind: ResourceKind,
    pub name: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

fn split_annotation(annotations: &BTreeMap<String, serde_yaml::Value>, key: &str) -> Vec<String> {
    annotations
        .get(key)
        .and_then(serde_yaml::Value::as_str)
        .map(|value| normalize_names(value.split(',')))
        .unwrap_or_default()
}

/// Parse the first document of a YAML definition.
pub fn parse_definition(path: &str, content: &str) -> Result<DefinitionMetadata, ExtractError> {
    let invalid = |message: String| ExtractError::Validation {
        path: path.to_string(),
        message,
    };

    let document = serde_yaml::Deserializer::from_str(content)
        .next()
        .ok_or_else(|| invalid("empty document".to_string()))?;
    let raw = RawDefinition::deserialize(document).map_err(|e| invalid(e.to_string()))?;

    let kind = match raw.kind.as_deref().map(str::trim) {
        None | Some("Task" | "ClusterTask") => ResourceKind::Task,
        Some("Pipeline") => ResourceKind::Pipeline,
        Some(other) => return Err(invalid(format!("unsupported kind '{other}'"))),
    };

    Ok(DefinitionMetadata {
        kind,
        name: raw.metadata.name,
        tags: split_annotation(&raw.metadata.annotations, TAGS_ANNOTATION),
        categories: split_annotation(&raw.metadata.annotations, CATEGORIES_ANNOTATION),
    })
}

/// SHA-256 over the definition and README content.
pub fn content_fingerprint(definition: &str, readme: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(definition.as_bytes());
    hasher.update([0u8]);
    hasher.update(readme.unwrap_or_default().as_bytes());
    format!("{:x}", hasher.finalize())
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Normalized metadata of one catalog directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedResource {
    /// Directory name, used as the resource name.
    pub name: String,
    pub kind: ResourceKind,
    pub description: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub definition_path: String,
    /// Empty when the directory has no documentation file.
    pub readme_path: String,
    pub content_hash: String,
}

impl ExtractedResource {
    /// Build a verified catalog record located in `repo`.
    pub fn into_new_resource(self, repo: &RepoCoordinates) -> NewResource {
        NewResource {
            name: self.name,
            description: self.description,
            kind: self.kind,
            verified: true,
            user_id: None,
            github: GithubDetails {
                owner: repo.owner.clone(),
                repository: repo.repository.clone(),
                git_ref: repo.git_ref.clone(),
                path: self.definition_path,
                readme_path: self.readme_path,
            },
            tags: self.tags,
            categories: self.categories,
            content_hash: self.content_hash,
        }
    }

    /// The content fields to write over an existing record, read at `git_ref`.
    pub fn content_update(&self, git_ref: &str) -> ResourceContentUpdate {
        ResourceContentUpdate {
            description: self.description.clone(),
            git_ref: git_ref.to_string(),
            kind: self.kind,
            readme_path: self.readme_path.clone(),
            tags: self.tags.clone(),
            categories: self.categories.clone(),
            content_hash: self.content_hash.clone(),
        }
    }
}

/// Result of looking at one candidate directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Resource(ExtractedResource),
    /// No definition file: the directory is not a resource.
    NotResource,
}

/// Reads a candidate directory's files and extracts its metadata.
pub struct MetadataExtractor {
    reader: Arc<dyn RemoteRepositoryReader>,
    retry: RetryPolicy,
    max_description_len: usize,
}

impl MetadataExtractor {
    pub fn new(
        reader: Arc<dyn RemoteRepositoryReader>,
        retry: RetryPolicy,
        max_description_len: usize,
    ) -> Self {
        Self {
            reader,
            retry,
            max_description_len,
        }
    }

    async fn fetch(&self, repo: &RepoCoordinates, path: &str) -> Result<String, RemoteError> {
        self.retry
            .run("fetch_file", path, || self.reader.fetch_file(repo, path))
            .await
    }

    /// Extract the resource described by `directory`, given its listing.
    ///
    /// Either every file is read and parsed, or an error is returned; nothing
    /// partial escapes.
    pub async fn extract(
        &self,
        repo: &RepoCoordinates,
        directory: &str,
        entries: &[RemoteEntry],
    ) -> Result<Extraction, ExtractError> {
        let Some(files) = classify_files(entries) else {
            return Ok(Extraction::NotResource);
        };

        let definition = self.fetch(repo, &files.definition.path).await?;
        let metadata = parse_definition(&files.definition.path, &definition)?;

        let readme = match files.readme {
            Some(entry) => Some(self.fetch(repo, &entry.path).await?),
            None => None,
        };

        let description = readme
            .as_deref()
            .map(|content| extract_description(content, self.max_description_len))
            .unwrap_or_default();

        Ok(Extraction::Resource(ExtractedResource {
            name: directory.to_string(),
            kind: metadata.kind,
            description,
            tags: metadata.tags,
            categories: metadata.categories,
            definition_path: files.definition.path.clone(),
            readme_path: files.readme.map(|e| e.path.clone()).unwrap_or_default(),
            content_hash: content_fingerprint(&definition, readme.as_deref()),
        }))
    }
}
