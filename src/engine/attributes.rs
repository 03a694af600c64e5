//! Version-Gated Schema Attributes
//!
//! Schema nodes may carry `#[since="1.20.5"]`, `#[until="1.21"]`,
//! `#[deprecated]` / `#[deprecated="1.21"]` and `#[pack_format]` attributes.
//! Their meaning depends on the version being validated, which the engine
//! passes in through [`AttributeContext`] on every evaluation.
//!
//! Malformed version values fail open: the element stays active and the
//! field stays as declared, with a warning in the log.

use std::cmp::Ordering;

use serde_json::Value;
use thiserror::Error;
use tower_lsp::lsp_types::Range;

use super::meta::EngineMeta;
use super::{EngineDiagnostic, SEVERITY_ERROR};
use crate::sources::VersionManifest;
use crate::version::{looks_like_release, VersionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} value for attribute")]
pub struct AttributeValueError {
    pub expected: &'static str,
}

/// Shape check applied to an attribute's raw value before it reaches the behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueValidator {
    String,
    OptionalString,
    /// The value is ignored
    Unit,
}

impl ValueValidator {
    pub fn accept(&self, raw: Option<&Value>) -> Result<Option<String>, AttributeValueError> {
        match (self, raw) {
            (Self::Unit, _) => Ok(None),
            (Self::String | Self::OptionalString, Some(Value::String(s))) => Ok(Some(s.clone())),
            (Self::OptionalString, None) => Ok(None),
            (Self::String, _) => Err(AttributeValueError { expected: "a string" }),
            (Self::OptionalString, Some(_)) => Err(AttributeValueError {
                expected: "an optional string",
            }),
        }
    }
}

/// Evaluation-time inputs for attribute behaviors
#[derive(Debug, Clone, Copy)]
pub struct AttributeContext<'a> {
    pub version: &'a VersionId,
}

/// A struct field as declared in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub key: String,
    pub optional: bool,
    pub deprecated: bool,
    pub type_def: Value,
}

/// Collects checker diagnostics for one node
#[derive(Debug, Default)]
pub struct CheckContext {
    diagnostics: Vec<EngineDiagnostic>,
}

impl CheckContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, message: impl Into<String>, range: Range, severity: u8) {
        self.diagnostics
            .push(EngineDiagnostic::new(Some(range), severity, message));
    }

    pub fn into_diagnostics(self) -> Vec<EngineDiagnostic> {
        self.diagnostics
    }
}

/// Checks a value node against its type; receives the node's range
pub type NodeChecker = Box<dyn Fn(Range, &mut CheckContext) + Send + Sync>;

/// Hooks an attribute can provide. Every hook defaults to "no effect".
pub trait AttributeBehavior: Send + Sync {
    /// Whether the annotated element exists for the context's version
    fn filter_element(&self, _config: Option<&str>, _ctx: &AttributeContext<'_>) -> bool {
        true
    }

    /// Rewrite the annotated struct field
    fn map_field(
        &self,
        _config: Option<&str>,
        field: FieldDef,
        _ctx: &AttributeContext<'_>,
    ) -> FieldDef {
        field
    }

    /// Extra checker for values of the annotated type
    fn checker(&self, _config: Option<&str>, _type_def: &Value) -> Option<NodeChecker> {
        None
    }
}

/// Element exists from `since` onwards
pub fn since_active(version: &VersionId, since: &str) -> bool {
    gate("since", version, since, Ordering::is_ge)
}

/// Element exists before `until`
pub fn until_active(version: &VersionId, until: &str) -> bool {
    gate("until", version, until, Ordering::is_lt)
}

/// Whether a field deprecated `since` the given version (or always, when
/// absent) is deprecated for `version`. `None` for a malformed value.
pub fn deprecated_for(version: &VersionId, since: Option<&str>) -> Option<bool> {
    match since {
        None => Some(true),
        Some(since) if looks_like_release(since) => Some(version.cmp_release(since).is_ge()),
        Some(since) => {
            log::warn!("Invalid mcdoc attribute for \"deprecated\": {}", since);
            None
        }
    }
}

fn gate(attribute: &str, version: &VersionId, bound: &str, keep: fn(Ordering) -> bool) -> bool {
    if !looks_like_release(bound) {
        log::warn!("Invalid mcdoc attribute for \"{}\": {}", attribute, bound);
        return true;
    }
    keep(version.cmp_release(bound))
}

struct Since;

impl AttributeBehavior for Since {
    fn filter_element(&self, config: Option<&str>, ctx: &AttributeContext<'_>) -> bool {
        config.is_none_or(|since| since_active(ctx.version, since))
    }
}

struct Until;

impl AttributeBehavior for Until {
    fn filter_element(&self, config: Option<&str>, ctx: &AttributeContext<'_>) -> bool {
        config.is_none_or(|until| until_active(ctx.version, until))
    }
}

struct Deprecated;

impl AttributeBehavior for Deprecated {
    fn map_field(&self, config: Option<&str>, field: FieldDef, ctx: &AttributeContext<'_>) -> FieldDef {
        match deprecated_for(ctx.version, config) {
            Some(true) => FieldDef {
                deprecated: true,
                ..field
            },
            Some(false) | None => field,
        }
    }
}

/// Rejects numeric pack format literals newer than any known version
struct PackFormatCeiling {
    max: u32,
}

impl AttributeBehavior for PackFormatCeiling {
    fn checker(&self, _config: Option<&str>, type_def: &Value) -> Option<NodeChecker> {
        if type_def.get("kind").and_then(Value::as_str) != Some("literal") {
            return None;
        }
        let target = type_def.get("value")?.get("value")?.as_f64()?;

        let max = self.max;
        Some(Box::new(move |range, ctx| {
            if target > f64::from(max) {
                ctx.report(format!("Expected a number ≤ {}", max), range, SEVERITY_ERROR);
            }
        }))
    }
}

/// Installs the version-gated attributes into an engine's meta registry
pub struct AttributeRegistrar;

impl AttributeRegistrar {
    /// The `pack_format` ceiling is the newest manifest entry's major pack format
    pub fn install(meta: &mut EngineMeta, manifest: &VersionManifest) {
        meta.register_attribute("since", ValueValidator::String, Box::new(Since));
        meta.register_attribute("until", ValueValidator::String, Box::new(Until));
        meta.register_attribute(
            "deprecated",
            ValueValidator::OptionalString,
            Box::new(Deprecated),
        );
        meta.register_attribute(
            "pack_format",
            ValueValidator::Unit,
            Box::new(PackFormatCeiling {
                max: manifest.max_pack_format(),
            }),
        );
    }
}
