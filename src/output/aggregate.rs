//! Merging of entries from all chapters into the final result

use crate::catalog::Entry;
use std::collections::HashSet;

/// Deduplicates by code (first occurrence wins) and sorts by code
///
/// Codes compare as plain strings. Applying this to its own output returns
/// the same sequence.
pub fn aggregate(entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.code.clone()))
        .collect();

    unique.sort_by(|a, b| a.code.cmp(&b.code));
    unique
}
