//! Rating domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted star value.
pub const MIN_STARS: u8 = 1;

/// Highest accepted star value.
pub const MAX_STARS: u8 = 5;

/// A user's active rating of a resource.
///
/// A user has at most one rating per resource; revisions replace `stars`
/// and keep the replaced value in `prev_stars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: i64,
    pub resource_id: i64,
    pub stars: u8,
    /// Value replaced by the last revision, 0 if never revised.
    pub prev_stars: u8,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub resource_id: i64,
    /// Arithmetic mean of all active ratings, 0.0 when unrated.
    pub average: f64,
    /// Number of active ratings.
    pub count: u64,
}

/// Whether `stars` is inside the accepted range.
pub const fn is_valid_stars(stars: u8) -> bool {
    stars >= MIN_STARS && stars <= MAX_STARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_range() {
        assert!(!is_valid_stars(0));
        assert!(is_valid_stars(1));
        assert!(is_valid_stars(5));
        assert!(!is_valid_stars(6));
    }
}
