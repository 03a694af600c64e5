//! Symbol table access and the registrars this crate feeds the engine with.

use std::sync::Arc;

use serde_json::{json, Value};

use super::EngineFault;
use crate::sources::RegistrySummary;
use crate::version::VersionId;

/// Pseudo-document the vanilla schema declarations are attributed to
pub const VANILLA_MCDOC_URI: &str = "mcdoc://vanilla-mcdoc/symbols.json";
/// Pseudo-document the registry summary declarations are attributed to
pub const SUMMARY_URI: &str = "mcmeta://summary/registries.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolUsage {
    Declaration,
    Definition,
    Reference,
}

/// The engine's symbol table, as seen by registrars and binders
pub trait SymbolTable {
    fn enter(
        &mut self,
        uri: &str,
        category: &str,
        identifier: &str,
        usage: SymbolUsage,
        data: Option<Value>,
    ) -> Result<(), EngineFault>;

    fn enter_member(
        &mut self,
        uri: &str,
        category: &str,
        identifier: &str,
        member: &str,
        usage: SymbolUsage,
        data: Option<Value>,
    ) -> Result<(), EngineFault>;
}

pub trait SymbolRegistrar: Send + Sync {
    fn register(&self, symbols: &mut dyn SymbolTable) -> Result<(), EngineFault>;
}

/// Declares the generated vanilla schema types and dispatcher members
pub struct VanillaMcdocRegistrar {
    symbols: Arc<Value>,
}

impl VanillaMcdocRegistrar {
    pub fn new(symbols: Arc<Value>) -> Self {
        Self { symbols }
    }

    /// The `ref` the symbols were generated from
    pub fn checksum(symbols: &Value) -> String {
        symbols
            .get("ref")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    }
}

impl SymbolRegistrar for VanillaMcdocRegistrar {
    fn register(&self, symbols: &mut dyn SymbolTable) -> Result<(), EngineFault> {
        if let Some(types) = self.symbols.get("mcdoc").and_then(Value::as_object) {
            for (id, type_def) in types {
                symbols.enter(
                    VANILLA_MCDOC_URI,
                    "mcdoc",
                    id,
                    SymbolUsage::Declaration,
                    Some(json!({ "typeDef": type_def })),
                )?;
            }
        }

        if let Some(dispatchers) = self.symbols.get("mcdoc/dispatcher").and_then(Value::as_object) {
            for (dispatcher, members) in dispatchers {
                symbols.enter(
                    VANILLA_MCDOC_URI,
                    "mcdoc/dispatcher",
                    dispatcher,
                    SymbolUsage::Declaration,
                    None,
                )?;

                let Some(members) = members.as_object() else {
                    continue;
                };
                for (member, type_def) in members {
                    symbols.enter_member(
                        VANILLA_MCDOC_URI,
                        "mcdoc/dispatcher",
                        dispatcher,
                        member,
                        SymbolUsage::Declaration,
                        Some(json!({ "typeDef": type_def })),
                    )?;
                }
            }
        }

        Ok(())
    }
}

/// Declares every registry entry and block of a version's summary
pub struct SummaryRegistrar {
    summary: Arc<RegistrySummary>,
    release: VersionId,
}

impl SummaryRegistrar {
    pub fn new(summary: Arc<RegistrySummary>, release: VersionId) -> Self {
        Self { summary, release }
    }
}

impl SymbolRegistrar for SummaryRegistrar {
    fn register(&self, symbols: &mut dyn SymbolTable) -> Result<(), EngineFault> {
        log::debug!("Registering summary symbols for {}", self.release);

        for (registry, entries) in &self.summary.registries {
            for entry in entries {
                symbols.enter(SUMMARY_URI, registry, entry, SymbolUsage::Declaration, None)?;
            }
        }

        for (block, states) in &self.summary.block_states {
            let id = if block.contains(':') {
                block.clone()
            } else {
                format!("minecraft:{}", block)
            };
            symbols.enter(
                SUMMARY_URI,
                "block",
                &id,
                SymbolUsage::Declaration,
                Some(states.clone()),
            )?;
        }

        Ok(())
    }
}
