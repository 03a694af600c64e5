use serde::{Deserialize, Serialize};

use crate::resolver::PackFormatInput;

/// One document to validate, as sent by callers.
///
/// Exactly one of `version` and `pack_format` selects the game version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// Data pack category, e.g. `recipe` or `tag/block`
    #[serde(alias = "type")]
    pub category: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_format: Option<PackFormatInput>,
}

impl ValidationRequest {
    pub fn for_version(
        category: impl Into<String>,
        content: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            content: content.into(),
            version: Some(version.into()),
            pack_format: None,
        }
    }

    pub fn for_pack_format(
        category: impl Into<String>,
        content: impl Into<String>,
        pack_format: impl Into<PackFormatInput>,
    ) -> Self {
        Self {
            category: category.into(),
            content: content.into(),
            version: None,
            pack_format: Some(pack_format.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Valid exactly when the engine reported nothing
    pub fn from_diagnostics(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![message.into()],
        }
    }

    pub fn is_error(&self) -> bool {
        !self.valid
    }

    /// Human-readable summary of this result for `request`
    pub fn report(&self, request: &ValidationRequest) -> String {
        if self.valid {
            let target = match (&request.version, &request.pack_format) {
                (Some(version), _) if !version.is_empty() => version.clone(),
                (_, Some(pack_format)) => format!("pack format {}", pack_format),
                _ => "unknown version".to_string(),
            };
            format!("✓ Valid {} JSON for Minecraft {}", request.category, target)
        } else {
            format!(
                "✗ Invalid {} JSON:\n\n{}",
                request.category,
                self.errors.join("\n")
            )
        }
    }
}
