//! Game version identifiers.
//!
//! Release ids look like `1.20.4`. Snapshots (`24w14a`) and pre-releases
//! (`1.21-pre1`) pass through untouched, but only the leading numeric
//! components take part in comparisons.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// First 1.x minor release with singular registry folder names
const SINGULAR_FOLDERS_SINCE_MINOR: u32 = 21;

/// A game version id as accepted by the schema engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare this version against another release id, component by component
    pub fn cmp_release(&self, other: &str) -> Ordering {
        compare_releases(&self.0, other)
    }

    /// `(major, minor)` when the first two dot-separated parts are plain numbers
    pub fn release_parts(&self) -> Option<(u32, u32)> {
        let mut parts = self.0.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some((major, minor))
    }

    /// Whether documents for this version live under pluralized folders
    /// (`recipes/`, `tags/blocks/`, ...)
    pub fn uses_legacy_paths(&self) -> bool {
        matches!(self.release_parts(), Some((1, minor)) if minor < SINGULAR_FOLDERS_SINCE_MINOR)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// True when `value` starts with a run of digits followed by a dot
pub fn looks_like_release(value: &str) -> bool {
    match value.split_once('.') {
        Some((head, _)) => !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Compare two release ids numerically. Missing components count as zero,
/// and each component only contributes its leading digits.
pub fn compare_releases(a: &str, b: &str) -> Ordering {
    let left = numeric_components(a);
    let right = numeric_components(b);
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

fn numeric_components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}
