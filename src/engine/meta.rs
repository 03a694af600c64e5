//! Extension registry the engine consults while checking.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::attributes::{AttributeBehavior, ValueValidator};
use super::binder::UriBinder;
use super::symbols::SymbolRegistrar;

pub struct AttributeRegistration {
    pub validator: ValueValidator,
    pub behavior: Box<dyn AttributeBehavior>,
}

/// A named provider of declarations, re-run when its checksum changes
pub struct SymbolSource {
    pub checksum: String,
    pub registrar: Box<dyn SymbolRegistrar>,
}

#[derive(Default)]
pub struct EngineMeta {
    attributes: HashMap<String, AttributeRegistration>,
    symbol_sources: BTreeMap<String, SymbolSource>,
    uri_binders: Vec<Arc<dyn UriBinder>>,
}

impl EngineMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema attribute; a later registration under the same name replaces it
    pub fn register_attribute(
        &mut self,
        name: &str,
        validator: ValueValidator,
        behavior: Box<dyn AttributeBehavior>,
    ) {
        self.attributes.insert(
            name.to_string(),
            AttributeRegistration {
                validator,
                behavior,
            },
        );
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeRegistration> {
        self.attributes.get(name)
    }

    pub fn register_symbol_source(&mut self, key: &str, source: SymbolSource) {
        self.symbol_sources.insert(key.to_string(), source);
    }

    pub fn symbol_sources(&self) -> impl Iterator<Item = (&str, &SymbolSource)> {
        self.symbol_sources
            .iter()
            .map(|(key, source)| (key.as_str(), source))
    }

    pub fn register_uri_binder(&mut self, binder: Arc<dyn UriBinder>) {
        self.uri_binders.push(binder);
    }

    /// Registered binders in registration order
    pub fn uri_binders(&self) -> &[Arc<dyn UriBinder>] {
        &self.uri_binders
    }
}

impl fmt::Debug for EngineMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut attributes: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        attributes.sort_unstable();

        f.debug_struct("EngineMeta")
            .field("attributes", &attributes)
            .field(
                "symbol_sources",
                &self.symbol_sources.keys().collect::<Vec<_>>(),
            )
            .field("uri_binders", &self.uri_binders.len())
            .finish()
    }
}
