//! Datapack Validator
//!
//! Validates Minecraft data pack JSON documents against the vanilla schemas
//! of a chosen game version.
//!
//! This library provides:
//! - Version resolution from a version id or a data pack format
//! - Isolated per-call workspaces for the schema engine
//! - Version-gated schema attributes and engine extension points
//! - Stable, human-readable diagnostic formatting
//! - Configuration management

pub mod config;
pub mod core;
pub mod engine;
pub mod resolver;
pub mod sources;
pub mod validation;
pub mod version;

pub use config::Config;
pub use core::{ErrorFormatter, WorkspaceManager};
pub use engine::{EngineLauncher, SchemaEngine};
pub use resolver::{PackFormatInput, Selector, VersionResolver};
pub use sources::{DataSource, McmetaClient};
pub use validation::{PipelineError, ValidationPipeline, ValidationRequest, ValidationResult};
pub use version::VersionId;
