//! Shared test doubles: an in-memory data source and a scripted schema
//! engine that checks a handful of category rules with serde_json.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use datapack_validator::engine::attributes::AttributeContext;
use datapack_validator::engine::fault::PARENT_SYMBOL_FAULT;
use datapack_validator::engine::{
    BindContext, CheckedDocument, EngineDiagnostic, EngineFault, EngineLauncher, EngineMeta,
    FileNode, InitContext, Initializer, ProjectOptions, SchemaEngine, SymbolTable, SymbolUsage,
    TextDocument, UriBinder, SEVERITY_ERROR, SEVERITY_WARNING,
};
use datapack_validator::sources::{DataSource, FetchError, VersionEntry, VersionManifest};
use datapack_validator::{Config, ValidationPipeline};
use serde_json::{json, Value};
use tower_lsp::async_trait;
use tower_lsp::lsp_types::{Position, Range, Url};

pub const SHAPED_RECIPE: &str = r###"{
  "type": "minecraft:crafting_shaped",
  "pattern": ["##", "##"],
  "key": { "#": { "item": "minecraft:oak_planks" } },
  "result": { "id": "minecraft:crafting_table", "count": 1 }
}"###;

pub const NUMERIC_TYPE_RECIPE: &str = r###"{
  "type": 42,
  "pattern": ["##", "##"],
  "key": { "#": { "item": "minecraft:oak_planks" } },
  "result": { "id": "minecraft:crafting_table", "count": 1 }
}"###;

pub const ADVANCEMENT: &str = r#"{
  "parent": "minecraft:story/root",
  "criteria": { "tick": { "trigger": "minecraft:tick" } }
}"#;

/// In-memory stand-in for the remote services
pub struct StaticSource {
    manifest: VersionManifest,
    fail_manifest: bool,
}

impl StaticSource {
    pub fn new() -> Self {
        Self {
            manifest: VersionManifest::new(vec![
                VersionEntry::new("1.21.4", 61, None),
                VersionEntry::new("1.21.3", 57, None),
                VersionEntry::new("1.21.2", 57, None),
                VersionEntry::new("1.20.6", 41, None),
                VersionEntry::new("1.20.5", 41, None),
                VersionEntry::new("1.20.4", 26, None),
            ]),
            fail_manifest: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_manifest: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn versions(&self) -> Result<VersionManifest, FetchError> {
        if self.fail_manifest {
            return Err(FetchError::Status {
                url: "memory://summary/versions".to_string(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(self.manifest.clone())
    }

    async fn registries(&self, _version: &str) -> Result<BTreeMap<String, Vec<String>>, FetchError> {
        let mut registries = BTreeMap::new();
        registries.insert(
            "item".to_string(),
            vec![
                "minecraft:oak_planks".to_string(),
                "minecraft:crafting_table".to_string(),
            ],
        );
        Ok(registries)
    }

    async fn block_states(&self, _version: &str) -> Result<BTreeMap<String, Value>, FetchError> {
        let mut blocks = BTreeMap::new();
        blocks.insert("oak_planks".to_string(), json!([{}, {}]));
        Ok(blocks)
    }

    async fn vanilla_mcdoc(&self) -> Result<Value, FetchError> {
        Ok(json!({
            "ref": "test-ref",
            "mcdoc": { "::java::data::recipe::Recipe": { "kind": "struct" } },
            "mcdoc/dispatcher": {
                "minecraft:resource": { "recipe": { "kind": "reference" } }
            }
        }))
    }
}

/// Ways the scripted engine can misbehave
#[derive(Debug, Clone, Copy, Default)]
pub struct Script {
    pub fail_launch: bool,
    pub fail_submit: bool,
    pub fail_check: bool,
    pub fail_close: bool,
    pub no_node: bool,
    /// Raise the parent-symbol fault in the background while checking
    pub parent_symbol_fault: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub category: String,
    pub identifier: String,
    pub member: Option<String>,
    pub usage: SymbolUsage,
}

/// What the engine saw, shared with the test
#[derive(Debug, Default)]
pub struct EngineLog {
    pub launches: usize,
    pub closes: usize,
    pub project_roots: Vec<Url>,
    pub descriptor_pack_formats: Vec<u64>,
    pub submitted: Vec<Url>,
    pub symbol_sources: Vec<String>,
    pub symbols: Vec<SymbolEntry>,
}

#[derive(Default)]
struct MemorySymbols {
    entries: Vec<SymbolEntry>,
}

impl MemorySymbols {
    fn has_definition(&self, category: &str, identifier: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry.category == category
                && entry.identifier == identifier
                && entry.usage == SymbolUsage::Definition
        })
    }
}

impl SymbolTable for MemorySymbols {
    fn enter(
        &mut self,
        _uri: &str,
        category: &str,
        identifier: &str,
        usage: SymbolUsage,
        _data: Option<Value>,
    ) -> Result<(), EngineFault> {
        self.entries.push(SymbolEntry {
            category: category.to_string(),
            identifier: identifier.to_string(),
            member: None,
            usage,
        });
        Ok(())
    }

    fn enter_member(
        &mut self,
        _uri: &str,
        category: &str,
        identifier: &str,
        member: &str,
        usage: SymbolUsage,
        _data: Option<Value>,
    ) -> Result<(), EngineFault> {
        self.entries.push(SymbolEntry {
            category: category.to_string(),
            identifier: identifier.to_string(),
            member: Some(member.to_string()),
            usage,
        });
        Ok(())
    }
}

/// The engine's own location binder: references the parent advancement,
/// which only works if the document's symbol was already defined
struct LocationBinder;

impl UriBinder for LocationBinder {
    fn bind(&self, uri: &Url, ctx: &mut BindContext<'_>) -> Result<(), EngineFault> {
        let path = uri.path();
        if path.contains("/advancement/") || path.contains("/advancements/") {
            ctx.symbols.enter(
                uri.as_str(),
                "advancement",
                "minecraft:test",
                SymbolUsage::Reference,
                None,
            )?;
        }
        Ok(())
    }
}

pub struct ScriptedLauncher {
    script: Script,
    log: Arc<Mutex<EngineLog>>,
}

impl ScriptedLauncher {
    pub fn new(script: Script) -> (Self, Arc<Mutex<EngineLog>>) {
        let log = Arc::new(Mutex::new(EngineLog::default()));
        (
            Self {
                script,
                log: log.clone(),
            },
            log,
        )
    }
}

#[async_trait]
impl EngineLauncher for ScriptedLauncher {
    async fn launch(
        &self,
        options: ProjectOptions,
        initializers: Vec<Box<dyn Initializer>>,
    ) -> Result<Box<dyn SchemaEngine>, EngineFault> {
        self.log.lock().unwrap().launches += 1;
        if self.script.fail_launch {
            return Err(EngineFault::new("engine failed to start"));
        }

        let mut meta = EngineMeta::new();
        for initializer in &initializers {
            let mut ctx = InitContext {
                game_version: &options.game_version,
                meta: &mut meta,
                default_binder: Arc::new(LocationBinder),
            };
            initializer.initialize(&mut ctx)?;
        }

        let mut symbols = MemorySymbols::default();
        for (_, source) in meta.symbol_sources() {
            source.registrar.register(&mut symbols)?;
        }

        {
            let mut log = self.log.lock().unwrap();
            log.project_roots.extend(options.project_roots.iter().cloned());
            log.symbol_sources
                .extend(meta.symbol_sources().map(|(key, _)| key.to_string()));
            for root in &options.project_roots {
                log.descriptor_pack_formats.push(read_pack_format(root));
            }
        }

        Ok(Box::new(ScriptedEngine {
            script: self.script,
            options,
            meta,
            symbols,
            documents: Vec::new(),
            log: self.log.clone(),
        }))
    }
}

fn read_pack_format(root: &Url) -> u64 {
    let path = root.to_file_path().unwrap().join("pack.mcmeta");
    let descriptor: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    descriptor["pack"]["pack_format"].as_u64().unwrap()
}

struct ScriptedEngine {
    script: Script,
    options: ProjectOptions,
    meta: EngineMeta,
    symbols: MemorySymbols,
    documents: Vec<TextDocument>,
    log: Arc<Mutex<EngineLog>>,
}

#[async_trait]
impl SchemaEngine for ScriptedEngine {
    async fn submit_document(
        &mut self,
        uri: &Url,
        language: &str,
        revision: i32,
        content: &str,
    ) -> Result<(), EngineFault> {
        if self.script.fail_submit {
            return Err(EngineFault::new("document rejected"));
        }
        self.log.lock().unwrap().submitted.push(uri.clone());
        self.documents.push(TextDocument {
            uri: uri.clone(),
            language: language.to_string(),
            revision,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn fully_checked(&mut self, uri: &Url) -> Result<Option<CheckedDocument>, EngineFault> {
        if self.script.fail_check {
            return Err(EngineFault::new("checker crashed"));
        }
        if self.script.no_node {
            return Ok(None);
        }
        let Some(document) = self.documents.iter().find(|d| &d.uri == uri).cloned() else {
            return Ok(None);
        };

        for binder in self.meta.uri_binders() {
            binder.bind(uri, &mut BindContext {
                symbols: &mut self.symbols,
            })?;
        }
        if self.script.parent_symbol_fault
            || (is_advancement(uri) && !self.symbols.has_definition("advancement", "minecraft:test"))
        {
            self.options.faults.report(EngineFault::new(format!(
                "{} for advancement minecraft:test",
                PARENT_SYMBOL_FAULT
            )));
        }

        let errors = self.check(uri, &document.content);
        Ok(Some(CheckedDocument {
            document,
            node: FileNode {
                uri: uri.clone(),
                errors,
            },
        }))
    }

    async fn close(&mut self) -> Result<(), EngineFault> {
        let mut log = self.log.lock().unwrap();
        log.closes += 1;
        log.symbols = self.symbols.entries.clone();
        if self.script.fail_close {
            return Err(EngineFault::new("engine close failed"));
        }
        Ok(())
    }
}

impl ScriptedEngine {
    fn check(&self, uri: &Url, content: &str) -> Vec<EngineDiagnostic> {
        let value: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                let at = Position::new(
                    e.line().saturating_sub(1) as u32,
                    e.column().saturating_sub(1) as u32,
                );
                return vec![EngineDiagnostic::new(
                    Some(Range::new(at, at)),
                    SEVERITY_ERROR,
                    e.to_string(),
                )];
            }
        };

        let Some(object) = value.as_object() else {
            return vec![error("Expected an object")];
        };

        let mut errors = Vec::new();
        match folder(uri).as_str() {
            "recipe" | "recipes" => {
                match object.get("type") {
                    Some(Value::String(kind)) if kind == "minecraft:crafting_shaped" => {
                        for key in ["pattern", "key", "result"] {
                            if !object.contains_key(key) {
                                errors.push(error(&format!("Missing key \"{}\"", key)));
                            }
                        }
                    }
                    Some(Value::String(_)) => {}
                    _ => errors.push(error("Expected a string")),
                }
                if object.contains_key("show_notification")
                    && !self.field_exists(Some("1.19.3"))
                {
                    errors.push(EngineDiagnostic::new(
                        Some(Range::default()),
                        SEVERITY_WARNING,
                        "Unknown key \"show_notification\"",
                    ));
                }
            }
            "loot_table" | "loot_tables" => {
                if object.get("pools").is_some_and(|pools| !pools.is_array()) {
                    errors.push(error("Expected a list"));
                }
            }
            "advancement" | "advancements" => {
                if object.get("criteria").is_some_and(|c| !c.is_object()) {
                    errors.push(error("Expected an object"));
                }
            }
            _ => {}
        }
        errors
    }

    /// Evaluates the registered `since` attribute for the engine's version
    fn field_exists(&self, since: Option<&str>) -> bool {
        let ctx = AttributeContext {
            version: &self.options.game_version,
        };
        self.meta
            .attribute("since")
            .is_none_or(|attr| attr.behavior.filter_element(since, &ctx))
    }
}

fn error(message: &str) -> EngineDiagnostic {
    EngineDiagnostic::new(Some(Range::default()), SEVERITY_ERROR, message)
}

fn is_advancement(uri: &Url) -> bool {
    matches!(folder(uri).as_str(), "advancement" | "advancements")
}

/// Folder between `data/<namespace>/` and the file name
fn folder(uri: &Url) -> String {
    let path = uri.path();
    let Some((_, rest)) = path.split_once("/data/minecraft/") else {
        return String::new();
    };
    rest.rsplit_once('/')
        .map(|(folder, _)| folder.to_string())
        .unwrap_or_default()
}

pub fn config_in(parent: &Path) -> Config {
    Config {
        workspace_dir: Some(parent.to_path_buf()),
        ..Config::default()
    }
}

pub fn pipeline_with(
    parent: &Path,
    source: StaticSource,
    script: Script,
) -> (ValidationPipeline, Arc<Mutex<EngineLog>>) {
    let (launcher, log) = ScriptedLauncher::new(script);
    let pipeline = ValidationPipeline::new(config_in(parent), Arc::new(source), Arc::new(launcher));
    (pipeline, log)
}

pub fn pipeline(parent: &Path) -> (ValidationPipeline, Arc<Mutex<EngineLog>>) {
    pipeline_with(parent, StaticSource::new(), Script::default())
}

/// Entries left in a workspace parent directory
pub fn leftovers(parent: &Path) -> usize {
    std::fs::read_dir(parent).unwrap().count()
}
