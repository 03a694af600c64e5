//! Document Binding
//!
//! The engine maps each document location to a schema category through a
//! URI binder. For hierarchical categories (advancements, whose criteria
//! attach to their parent), the engine's default binder can fail to create
//! the document's own symbol before its children reference it. The
//! [`ParentSymbolPatch`] pre-registers that symbol, then hands over to the
//! untouched default binder.

use std::sync::Arc;

use regex::Regex;
use tower_lsp::lsp_types::Url;

use super::EngineFault;
use super::symbols::{SymbolTable, SymbolUsage};

pub struct BindContext<'a> {
    pub symbols: &'a mut dyn SymbolTable,
}

pub trait UriBinder: Send + Sync {
    fn bind(&self, uri: &Url, ctx: &mut BindContext<'_>) -> Result<(), EngineFault>;
}

/// Runs before the default binder. Hooks cannot fail the bind.
pub trait PreBindHook: Send + Sync {
    fn before_bind(&self, uri: &Url, ctx: &mut BindContext<'_>);
}

/// Ordered pre-bind hooks followed by the default binder
pub struct BinderChain {
    hooks: Vec<Box<dyn PreBindHook>>,
    fallback: Arc<dyn UriBinder>,
}

impl BinderChain {
    pub fn new(fallback: Arc<dyn UriBinder>) -> Self {
        Self {
            hooks: Vec::new(),
            fallback,
        }
    }

    pub fn with_hook(mut self, hook: Box<dyn PreBindHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }
}

impl UriBinder for BinderChain {
    fn bind(&self, uri: &Url, ctx: &mut BindContext<'_>) -> Result<(), EngineFault> {
        for hook in &self.hooks {
            hook.before_bind(uri, ctx);
        }
        self.fallback.bind(uri, ctx)
    }
}

/// Pre-registers `<namespace>:<identifier>` as a definition for documents at
/// `.../data/<namespace>/<category>[s]/<identifier>.json`
pub struct ParentSymbolPatch {
    pattern: Option<Regex>,
}

impl ParentSymbolPatch {
    pub fn new<I, S>(categories: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = categories
            .into_iter()
            .map(|c| regex::escape(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = Regex::new(&format!(
            r"^(.+?)/data/([^/]+)/({})s?/(.+)\.json$",
            alternatives.join("|")
        ))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Wrap the engine's default binder
    pub fn wrap(self, default_binder: Arc<dyn UriBinder>) -> BinderChain {
        BinderChain::new(default_binder).with_hook(Box::new(self))
    }

    /// `(category, namespace:identifier)` for a matching document location
    pub fn parent_symbol(&self, uri: &str) -> Option<(String, String)> {
        let captures = self.pattern.as_ref()?.captures(uri)?;
        let namespace = captures.get(2)?.as_str();
        let category = captures.get(3)?.as_str();
        let identifier = captures.get(4)?.as_str();
        Some((category.to_string(), format!("{}:{}", namespace, identifier)))
    }
}

impl PreBindHook for ParentSymbolPatch {
    fn before_bind(&self, uri: &Url, ctx: &mut BindContext<'_>) {
        let Some((category, id)) = self.parent_symbol(uri.as_str()) else {
            return;
        };

        if let Err(e) = ctx
            .symbols
            .enter(uri.as_str(), &category, &id, SymbolUsage::Definition, None)
        {
            log::debug!("Ignoring failed pre-registration of {} {}: {}", category, id, e);
        }
    }
}
