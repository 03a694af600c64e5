//! Core Per-Request Building Blocks
//!
//! Workspace lifecycle, synthetic document placement and diagnostic formatting.

pub mod diagnostics;
pub mod document;
pub mod workspace;

pub use diagnostics::{Diagnostic, ErrorFormatter, Severity};
pub use document::{DocumentLocation, LocateError};
pub use workspace::{Workspace, WorkspaceError, WorkspaceManager};
