//! Candidate directory selection.

use crate::ports::RemoteEntry;
use crate::settings::CatalogSettings;

/// Keep the root entries that may hold a resource.
///
/// Only directories qualify; hidden and denylisted names are dropped. The
/// result is sorted by name so passes walk the tree in a stable order.
pub fn select_candidates(entries: Vec<RemoteEntry>, settings: &CatalogSettings) -> Vec<RemoteEntry> {
    let mut candidates: Vec<RemoteEntry> = entries
        .into_iter()
        .filter(|entry| entry.is_dir() && !settings.is_excluded(&entry.name))
        .collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    candidates
}
