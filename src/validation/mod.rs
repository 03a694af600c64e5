//! Validation
//!
//! The end-to-end pipeline and the request/result types it works with.

pub mod error;
pub mod pipeline;
pub mod result;

pub use error::PipelineError;
pub use pipeline::{PipelineState, ValidationPipeline};
pub use result::{ValidationRequest, ValidationResult};
