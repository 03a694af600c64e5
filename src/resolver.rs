//! Version Resolution
//!
//! Turns a request's version selector into a concrete version id. A pack
//! format is looked up in the remote manifest; a version id is passed through
//! and left for the engine to reject if it does not exist.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sources::{DataSource, FetchError, VersionManifest};
use crate::version::VersionId;

/// Problems with the request itself, detected before any I/O
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Cannot specify both version and packFormat")]
    ConflictingSelector,

    #[error("Must specify either version or packFormat")]
    MissingSelector,

    #[error("Invalid pack format: {0}. Expected format like \"94\" or \"94.1\"")]
    MalformedPackFormat(String),
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("No version found for pack format {0}")]
    NoMatchingVersion(String),

    #[error("Validation error: {0}")]
    Fetch(#[from] FetchError),
}

/// A pack format as sent by callers: `41`, `94.1`, `"41"` or `"94.1"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackFormatInput {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for PackFormatInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for PackFormatInput {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for PackFormatInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A parsed `major[.minor]` pack format
///
/// Components are kept wider than manifest formats so that an out-of-range
/// number stays well-formed and simply matches no version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackFormat {
    pub major: u64,
    pub minor: u64,
}

impl PackFormat {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let malformed = || InputError::MalformedPackFormat(input.to_string());
        let trimmed = input.trim();

        let (major, minor) = match trimmed.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (trimmed, None),
        };

        let major = parse_component(major).ok_or_else(malformed)?;
        let minor = match minor {
            Some(minor) => parse_component(minor).ok_or_else(malformed)?,
            None => 0,
        };

        Ok(Self { major, minor })
    }

    /// The major format as written to `pack.mcmeta`, if it fits
    pub fn descriptor_major(&self) -> Option<u32> {
        u32::try_from(self.major).ok()
    }
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Only overflow can fail here; saturate so it matches nothing
    Some(part.parse().unwrap_or(u64::MAX))
}

/// Exactly one way of choosing the version to validate against
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Version(VersionId),
    PackFormat { raw: String, format: PackFormat },
}

impl Selector {
    /// Build a selector from the two optional request fields.
    /// Blank strings count as absent for either field.
    pub fn from_parts(
        version: Option<&str>,
        pack_format: Option<&PackFormatInput>,
    ) -> Result<Self, InputError> {
        let version = version.filter(|v| !v.trim().is_empty());
        let pack_format = pack_format.filter(|input| match input {
            PackFormatInput::Text(text) => !text.trim().is_empty(),
            PackFormatInput::Number(_) => true,
        });

        match (version, pack_format) {
            (Some(_), Some(_)) => Err(InputError::ConflictingSelector),
            (None, None) => Err(InputError::MissingSelector),
            (Some(version), None) => Ok(Self::Version(VersionId::new(version.trim()))),
            (None, Some(input)) => {
                let raw = input.to_string();
                let format = PackFormat::parse(&raw)?;
                Ok(Self::PackFormat { raw, format })
            }
        }
    }

    pub fn pack_format(&self) -> Option<PackFormat> {
        match self {
            Self::PackFormat { format, .. } => Some(*format),
            Self::Version(_) => None,
        }
    }
}

/// A concrete version pinned for one validation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub id: VersionId,
    /// `None` when a version id was given that the manifest does not list
    pub pack_format: Option<(u32, u32)>,
}

/// Resolved version together with the manifest it was resolved against
#[derive(Debug, Clone)]
pub struct Resolution {
    pub version: VersionDescriptor,
    pub manifest: VersionManifest,
}

pub struct VersionResolver<'a> {
    source: &'a dyn DataSource,
}

impl<'a> VersionResolver<'a> {
    pub fn new(source: &'a dyn DataSource) -> Self {
        Self { source }
    }

    /// Fetch the manifest and pin `selector` to a version
    pub async fn resolve(&self, selector: &Selector) -> Result<Resolution, ResolutionError> {
        let manifest = self.source.versions().await?;
        let version = resolve_in(&manifest, selector)?;
        log::info!("Resolved {:?} to version {}", selector, version.id);
        Ok(Resolution { version, manifest })
    }
}

/// Pin `selector` against an already fetched manifest
pub fn resolve_in(
    manifest: &VersionManifest,
    selector: &Selector,
) -> Result<VersionDescriptor, ResolutionError> {
    match selector {
        Selector::Version(id) => {
            let pack_format = manifest
                .entries()
                .iter()
                .find(|entry| entry.id == id.as_str())
                .map(|entry| entry.pack_format());
            Ok(VersionDescriptor {
                id: id.clone(),
                pack_format,
            })
        }
        Selector::PackFormat { raw, format } => u32::try_from(format.major)
            .ok()
            .zip(u32::try_from(format.minor).ok())
            .and_then(|(major, minor)| manifest.find_pack_format(major, minor))
            .map(|entry| VersionDescriptor {
                id: VersionId::new(entry.id.clone()),
                pack_format: Some(entry.pack_format()),
            })
            .ok_or_else(|| ResolutionError::NoMatchingVersion(raw.clone())),
    }
}
