use serde::{Deserialize, Serialize};

/// One row of the remote version manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(default)]
    pub data_pack_version: u32,
    #[serde(default)]
    pub data_pack_version_minor: Option<u32>,
}

impl VersionEntry {
    pub fn new(id: impl Into<String>, major: u32, minor: Option<u32>) -> Self {
        Self {
            id: id.into(),
            data_pack_version: major,
            data_pack_version_minor: minor,
        }
    }

    /// `(major, minor)` pack format, with a missing minor read as 0
    pub fn pack_format(&self) -> (u32, u32) {
        (
            self.data_pack_version,
            self.data_pack_version_minor.unwrap_or(0),
        )
    }
}

/// The version manifest, in the order served (newest first)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionManifest {
    entries: Vec<VersionEntry>,
}

impl VersionManifest {
    pub fn new(entries: Vec<VersionEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, in manifest order, with the given pack format
    pub fn find_pack_format(&self, major: u32, minor: u32) -> Option<&VersionEntry> {
        self.entries
            .iter()
            .find(|entry| entry.pack_format() == (major, minor))
    }

    /// Major pack format of the newest entry, or 0 for an empty manifest
    pub fn max_pack_format(&self) -> u32 {
        self.entries
            .first()
            .map(|entry| entry.data_pack_version)
            .unwrap_or(0)
    }
}
