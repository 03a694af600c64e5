//! Workspace Management
//!
//! Every validation call gets its own temporary project:
//!
//! ```text
//! <tmp>/datapack-mcp-XXXXXX/
//!   root/pack.mcmeta
//!   cache/
//! ```
//!
//! The tree is removed by [`WorkspaceManager::release`]. A workspace that is
//! dropped without being released (early return, panic) is still removed by
//! the underlying [`TempDir`].

use std::io;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;
use thiserror::Error;
use tower_lsp::lsp_types::Url;

use crate::Config;

/// Project descriptor file the engine looks for in a project root
pub const PACK_DESCRIPTOR: &str = "pack.mcmeta";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace directory {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("workspace path is not a valid file URI: {0}")]
    Uri(PathBuf),

    #[error("workspace task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// An isolated project root and cache directory
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    root_dir: PathBuf,
    cache_dir: PathBuf,
    root_uri: Url,
    cache_uri: Url,
}

impl Workspace {
    pub fn base_dir(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// `file://` URI of the root, with a trailing slash
    pub fn root_uri(&self) -> &Url {
        &self.root_uri
    }

    /// `file://` URI of the cache, with a trailing slash
    pub fn cache_uri(&self) -> &Url {
        &self.cache_uri
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    prefix: String,
    parent: Option<PathBuf>,
}

impl WorkspaceManager {
    pub fn new(config: &Config) -> Self {
        Self {
            prefix: config.workspace_prefix.clone(),
            parent: config.workspace_dir.clone(),
        }
    }

    /// Create a fresh workspace whose descriptor declares `pack_format`
    pub async fn acquire(&self, pack_format: u32) -> Result<Workspace, WorkspaceError> {
        let prefix = self.prefix.clone();
        let parent = self.parent.clone();
        let dir = tokio::task::spawn_blocking(move || create_base_dir(&prefix, parent.as_deref()))
            .await??;

        let root_dir = dir.path().join("root");
        let cache_dir = dir.path().join("cache");
        for path in [&root_dir, &cache_dir] {
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|source| WorkspaceError::Create {
                    path: path.clone(),
                    source,
                })?;
        }

        let descriptor_path = root_dir.join(PACK_DESCRIPTOR);
        tokio::fs::write(&descriptor_path, pack_descriptor(pack_format))
            .await
            .map_err(|source| WorkspaceError::Write {
                path: descriptor_path.clone(),
                source,
            })?;

        let root_uri = directory_uri(&root_dir)?;
        let cache_uri = directory_uri(&cache_dir)?;

        log::debug!("Acquired workspace {}", dir.path().display());
        Ok(Workspace {
            dir: Some(dir),
            root_dir,
            cache_dir,
            root_uri,
            cache_uri,
        })
    }

    /// Remove the workspace tree. Failures are logged, never returned.
    pub async fn release(&self, mut workspace: Workspace) {
        let Some(dir) = workspace.dir.take() else {
            return;
        };
        let path = dir.path().to_path_buf();

        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => log::debug!("Released workspace {}", path.display()),
            Ok(Err(e)) => log::warn!("Failed to remove workspace {}: {}", path.display(), e),
            Err(e) => log::warn!("Workspace removal task for {} failed: {}", path.display(), e),
        }
    }
}

fn create_base_dir(prefix: &str, parent: Option<&Path>) -> Result<TempDir, WorkspaceError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix);

    match parent {
        Some(parent) => {
            let parent = std::path::absolute(parent).map_err(|source| WorkspaceError::Create {
                path: parent.to_path_buf(),
                source,
            })?;
            builder.tempdir_in(&parent).map_err(|source| WorkspaceError::Create {
                path: parent,
                source,
            })
        }
        None => builder.tempdir().map_err(|source| WorkspaceError::Create {
            path: std::env::temp_dir(),
            source,
        }),
    }
}

fn pack_descriptor(pack_format: u32) -> String {
    json!({
        "pack": {
            "pack_format": pack_format,
            "description": "Validation pack",
        }
    })
    .to_string()
}

fn directory_uri(path: &Path) -> Result<Url, WorkspaceError> {
    Url::from_directory_path(path).map_err(|_| WorkspaceError::Uri(path.to_path_buf()))
}
