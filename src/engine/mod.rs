//! Schema Engine Boundary
//!
//! The schema/type-checking engine is an external collaborator. This module
//! defines the surface it is driven through and the extensions this crate
//! installs into it:
//! - version-gated schema attributes (`attributes`)
//! - the parent-symbol pre-bind hook (`binder`)
//! - symbol registrars for vanilla schemas and registry summaries (`symbols`)
//! - a call-scoped channel for background engine faults (`fault`)

pub mod attributes;
pub mod binder;
pub mod fault;
pub mod initializer;
pub mod meta;
pub mod symbols;

use std::sync::Arc;

use thiserror::Error;
use tower_lsp::async_trait;
use tower_lsp::lsp_types::{Range, Url};

use crate::version::VersionId;

pub use attributes::AttributeRegistrar;
pub use binder::{BindContext, BinderChain, ParentSymbolPatch, PreBindHook, UriBinder};
pub use fault::{FaultListener, FaultReporter};
pub use initializer::DatapackInitializer;
pub use meta::EngineMeta;
pub use symbols::{SymbolRegistrar, SymbolTable, SymbolUsage};

/// Engine severity codes
pub const SEVERITY_HINT: u8 = 0;
pub const SEVERITY_INFORMATION: u8 = 1;
pub const SEVERITY_WARNING: u8 = 2;
pub const SEVERITY_ERROR: u8 = 3;

/// A fault raised by the engine or one of its extension points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineFault {
    message: String,
}

impl EngineFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A diagnostic as reported by the engine, with a 0-based range
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDiagnostic {
    pub range: Option<Range>,
    pub severity: u8,
    pub message: String,
}

impl EngineDiagnostic {
    pub fn new(range: Option<Range>, severity: u8, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
        }
    }
}

/// Root node of a checked document
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub uri: Url,
    pub errors: Vec<EngineDiagnostic>,
}

impl FileNode {
    /// Parser and checker diagnostics, in engine order
    pub fn errors(&self) -> &[EngineDiagnostic] {
        &self.errors
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    pub uri: Url,
    pub language: String,
    pub revision: i32,
    pub content: String,
}

/// A document after parse and full schema check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedDocument {
    pub document: TextDocument,
    pub node: FileNode,
}

/// Everything the engine needs to open a project for one call
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub project_roots: Vec<Url>,
    pub cache_root: Url,
    pub game_version: VersionId,
    /// Sink for faults the engine raises outside of a direct call
    pub faults: FaultReporter,
}

/// State handed to initializers while the engine starts up
pub struct InitContext<'a> {
    pub game_version: &'a VersionId,
    pub meta: &'a mut EngineMeta,
    /// The engine's built-in document-location-to-category binder
    pub default_binder: Arc<dyn UriBinder>,
}

/// Callback run by the engine during project initialization
pub trait Initializer: Send + Sync {
    fn initialize(&self, ctx: &mut InitContext<'_>) -> Result<(), EngineFault>;
}

/// Starts engine instances
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    /// Open a project and run `initializers` against its meta registry.
    /// Returns once the project is ready.
    async fn launch(
        &self,
        options: ProjectOptions,
        initializers: Vec<Box<dyn Initializer>>,
    ) -> Result<Box<dyn SchemaEngine>, EngineFault>;
}

/// A running engine instance bound to one project
#[async_trait]
pub trait SchemaEngine: Send {
    async fn submit_document(
        &mut self,
        uri: &Url,
        language: &str,
        revision: i32,
        content: &str,
    ) -> Result<(), EngineFault>;

    /// Parse and fully check a submitted document.
    /// `None` if the engine produced no node for it.
    async fn fully_checked(&mut self, uri: &Url) -> Result<Option<CheckedDocument>, EngineFault>;

    async fn close(&mut self) -> Result<(), EngineFault>;
}
