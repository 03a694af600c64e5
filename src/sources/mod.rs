//! Remote Data Sources
//!
//! The version manifest, per-version registry summaries and the vanilla
//! schema symbols all come from remote services. Every validation call
//! refetches them; nothing here caches across calls.

pub mod manifest;
pub mod mcmeta;
pub mod summary;

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tower_lsp::async_trait;

pub use manifest::{VersionEntry, VersionManifest};
pub use mcmeta::McmetaClient;
pub use summary::RegistrySummary;

/// Errors from fetching remote data
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },
}

/// Provider of the remote data a validation call depends on
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Version manifest, newest first
    async fn versions(&self) -> Result<VersionManifest, FetchError>;

    /// Registry contents for `version`, keyed by registry name, entries namespaced
    async fn registries(&self, version: &str) -> Result<BTreeMap<String, Vec<String>>, FetchError>;

    /// Block state definitions for `version`, keyed by block id
    async fn block_states(&self, version: &str) -> Result<BTreeMap<String, Value>, FetchError>;

    /// Generated vanilla schema symbols
    async fn vanilla_mcdoc(&self) -> Result<Value, FetchError>;
}
