//! Synthetic Document Placement
//!
//! A request's content is opened as `unsaved/data/minecraft/<segment>/test.json`
//! under the workspace root so the engine binds it to the right category.

use thiserror::Error;
use tower_lsp::lsp_types::Url;

use crate::version::VersionId;

/// Categories stored under a pluralized folder before 1.21
pub const LEGACY_PLURAL_CATEGORIES: [&str; 11] = [
    "loot_table",
    "predicate",
    "item_modifier",
    "advancement",
    "recipe",
    "tag/function",
    "tag/item",
    "tag/block",
    "tag/fluid",
    "tag/entity_type",
    "tag/game_event",
];

#[derive(Debug, Error)]
#[error("cannot place {category} document under {root}: {reason}")]
pub struct LocateError {
    pub category: String,
    pub root: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    pub uri: Url,
    /// Folder the category was placed in
    pub segment: String,
}

impl DocumentLocation {
    pub fn locate(root: &Url, category: &str, version: &VersionId) -> Result<Self, LocateError> {
        let segment = path_segment(category, version);
        let uri = root
            .join(&format!("unsaved/data/minecraft/{}/test.json", segment))
            .map_err(|e| LocateError {
                category: category.to_string(),
                root: root.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { uri, segment })
    }
}

/// Folder for `category` at `version`: `<category>s` for the legacy set
/// before 1.21, otherwise the category itself
pub fn path_segment(category: &str, version: &VersionId) -> String {
    if version.uses_legacy_paths() && LEGACY_PLURAL_CATEGORIES.contains(&category) {
        format!("{}s", category)
    } else {
        category.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("file:///tmp/datapack-mcp-abc/root/").unwrap()
    }

    #[test]
    fn test_legacy_segments() {
        let old = VersionId::new("1.20.4");
        assert_eq!(path_segment("recipe", &old), "recipes");
        assert_eq!(path_segment("tag/block", &old), "tag/blocks");
        assert_eq!(path_segment("worldgen/biome", &old), "worldgen/biome");
        assert_eq!(path_segment("damage_type", &old), "damage_type");
    }

    #[test]
    fn test_modern_segments() {
        let new = VersionId::new("1.21.4");
        assert_eq!(path_segment("recipe", &new), "recipe");
        assert_eq!(path_segment("advancement", &new), "advancement");

        let snapshot = VersionId::new("24w14a");
        assert_eq!(path_segment("recipe", &snapshot), "recipe");
    }

    #[test]
    fn test_locate() {
        let location =
            DocumentLocation::locate(&root(), "loot_table", &VersionId::new("1.20.4")).unwrap();
        assert_eq!(location.segment, "loot_tables");
        assert_eq!(
            location.uri.as_str(),
            "file:///tmp/datapack-mcp-abc/root/unsaved/data/minecraft/loot_tables/test.json"
        );
    }
}
