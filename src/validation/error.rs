use thiserror::Error;

use crate::core::{LocateError, WorkspaceError};
use crate::engine::EngineFault;
use crate::resolver::{InputError, ResolutionError};
use crate::sources::FetchError;

/// Everything that can stop a validation call before the engine reports
/// diagnostics. Each variant's message is what the caller sees.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Validation error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Validation error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Validation error: {0}")]
    Engine(EngineFault),

    #[error("Failed to open document: {0}")]
    Document(String),

    #[error("Validation error: {0}")]
    Check(EngineFault),

    #[error("Failed to parse/check document - invalid JSON syntax or structure")]
    Unchecked,
}

impl From<LocateError> for PipelineError {
    fn from(err: LocateError) -> Self {
        Self::Document(err.to_string())
    }
}
