//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, Utc};
use hub_core::{GithubDetails, Rating, RepositoryError, Resource, ResourceKind};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Separator used by `group_concat` for label lists (ASCII unit separator).
const LABEL_SEPARATOR: char = '\u{1f}';

/// Shared SELECT for resource queries, joined with GitHub details and labels.
///
/// Callers append `WHERE`/`ORDER BY` clauses referring to `r` (resource) and
/// `g` (github details).
pub const RESOURCE_SELECT: &str = r"
    SELECT r.id, r.name, r.description, r.kind, r.rating, r.downloads, r.verified,
           r.user_id, r.content_hash, r.created_at, r.updated_at,
           g.owner, g.repository, g.git_ref, g.path, g.readme_path,
           (SELECT group_concat(t.name, char(31))
              FROM resource_tag rt JOIN tag t ON t.id = rt.tag_id
             WHERE rt.resource_id = r.id) AS tags,
           (SELECT group_concat(c.name, char(31))
              FROM resource_category rc JOIN category c ON c.id = rc.category_id
             WHERE rc.resource_id = r.id) AS categories
      FROM resource r
      JOIN github_details g ON g.resource_id = r.id
";

/// Map a sqlx error to a storage error.
pub fn storage_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

/// Whether a sqlx error is a UNIQUE or PRIMARY KEY violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Current time in the stored text format.
pub fn now_string() -> String {
    Utc::now().to_rfc3339()
}

/// Parse a stored RFC 3339 timestamp.
pub fn parse_datetime(datetime_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(datetime_str)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column).map_err(storage_error)
}

fn split_labels(joined: Option<String>) -> Vec<String> {
    let mut labels: Vec<String> = joined
        .as_deref()
        .unwrap_or_default()
        .split(LABEL_SEPARATOR)
        .filter(|label| !label.is_empty())
        .map(ToString::to_string)
        .collect();
    labels.sort();
    labels
}

/// Parse a row from [`RESOURCE_SELECT`] into a Resource.
pub fn row_to_resource(row: &SqliteRow) -> Result<Resource, RepositoryError> {
    let kind: String = get(row, "kind")?;
    let kind = kind
        .parse::<ResourceKind>()
        .map_err(RepositoryError::Serialization)?;

    let created_at: String = get(row, "created_at")?;
    let updated_at: String = get(row, "updated_at")?;

    Ok(Resource {
        id: get(row, "id")?,
        name: get(row, "name")?,
        description: get(row, "description")?,
        kind,
        rating: get(row, "rating")?,
        downloads: get(row, "downloads")?,
        verified: get(row, "verified")?,
        user_id: get(row, "user_id")?,
        github: GithubDetails {
            owner: get(row, "owner")?,
            repository: get(row, "repository")?,
            git_ref: get(row, "git_ref")?,
            path: get(row, "path")?,
            readme_path: get(row, "readme_path")?,
        },
        tags: split_labels(get(row, "tags")?),
        categories: split_labels(get(row, "categories")?),
        content_hash: get(row, "content_hash")?,
        created_at: parse_datetime(&created_at).unwrap_or_else(Utc::now),
        updated_at: parse_datetime(&updated_at).unwrap_or_else(Utc::now),
    })
}

fn stars_from(value: i64, column: &str) -> Result<u8, RepositoryError> {
    u8::try_from(value)
        .map_err(|_| RepositoryError::Serialization(format!("{column} out of range: {value}")))
}

/// Parse a rating row.
pub fn row_to_rating(row: &SqliteRow) -> Result<Rating, RepositoryError> {
    let updated_at: String = get(row, "updated_at")?;
    Ok(Rating {
        user_id: get(row, "user_id")?,
        resource_id: get(row, "resource_id")?,
        stars: stars_from(get(row, "stars")?, "stars")?,
        prev_stars: stars_from(get(row, "prev_stars")?, "prev_stars")?,
        updated_at: parse_datetime(&updated_at).unwrap_or_else(Utc::now),
    })
}
