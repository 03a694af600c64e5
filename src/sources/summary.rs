use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::{DataSource, FetchError};
use crate::version::VersionId;

/// Declaration data for one resolved version, handed to the engine as-is
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySummary {
    pub version: VersionId,
    pub registries: BTreeMap<String, Vec<String>>,
    pub block_states: BTreeMap<String, Value>,
    pub fluids: Value,
    pub command_tree: Value,
}

impl RegistrySummary {
    /// Fetch registries and block states for `version` concurrently
    pub async fn fetch(source: &dyn DataSource, version: &VersionId) -> Result<Self, FetchError> {
        let (registries, block_states) = tokio::try_join!(
            source.registries(version.as_str()),
            source.block_states(version.as_str()),
        )?;

        log::debug!(
            "Fetched summary for {}: {} registries, {} blocks",
            version,
            registries.len(),
            block_states.len()
        );

        Ok(Self::new(version.clone(), registries, block_states))
    }

    pub fn new(
        version: VersionId,
        registries: BTreeMap<String, Vec<String>>,
        block_states: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            version,
            registries,
            block_states,
            fluids: vanilla_fluids(),
            command_tree: json!({ "type": "root", "children": {} }),
        }
    }

    pub fn registry(&self, name: &str) -> Option<&[String]> {
        self.registries.get(name).map(Vec::as_slice)
    }
}

/// Fluid states in the same `[properties, defaults]` shape as block states
fn vanilla_fluids() -> Value {
    let levels: Vec<String> = (1..=8).map(|level| level.to_string()).collect();
    let flowing = json!([
        { "falling": ["false", "true"], "level": levels },
        { "falling": "false", "level": "1" }
    ]);
    let source = json!([
        { "falling": ["false", "true"] },
        { "falling": "false" }
    ]);

    json!({
        "flowing_lava": flowing.clone(),
        "flowing_water": flowing,
        "lava": source.clone(),
        "water": source,
    })
}
