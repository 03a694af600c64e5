use std::sync::Arc;

use serde_json::Value;

use super::attributes::AttributeRegistrar;
use super::binder::ParentSymbolPatch;
use super::meta::SymbolSource;
use super::symbols::{SummaryRegistrar, VanillaMcdocRegistrar};
use super::{EngineFault, InitContext, Initializer};
use crate::sources::{RegistrySummary, VersionManifest};

/// Registers everything a datapack validation run needs: vanilla schema
/// symbols, the version's registry summary, the parent-symbol binder patch
/// and the version-gated attributes.
pub struct DatapackInitializer {
    pub vanilla_mcdoc: Arc<Value>,
    pub summary: Arc<RegistrySummary>,
    pub manifest: VersionManifest,
    pub parent_symbol_categories: Vec<String>,
}

impl Initializer for DatapackInitializer {
    fn initialize(&self, ctx: &mut InitContext<'_>) -> Result<(), EngineFault> {
        ctx.meta.register_symbol_source(
            "vanilla-mcdoc",
            SymbolSource {
                checksum: VanillaMcdocRegistrar::checksum(&self.vanilla_mcdoc),
                registrar: Box::new(VanillaMcdocRegistrar::new(self.vanilla_mcdoc.clone())),
            },
        );

        let patch = ParentSymbolPatch::new(&self.parent_symbol_categories)
            .map_err(|e| EngineFault::new(format!("invalid parent symbol category: {}", e)))?;
        ctx.meta
            .register_uri_binder(Arc::new(patch.wrap(ctx.default_binder.clone())));

        ctx.meta.register_symbol_source(
            "mcmeta-summary",
            SymbolSource {
                checksum: ctx.game_version.to_string(),
                registrar: Box::new(SummaryRegistrar::new(
                    self.summary.clone(),
                    ctx.game_version.clone(),
                )),
            },
        );

        AttributeRegistrar::install(ctx.meta, &self.manifest);

        log::debug!("Initialized engine meta for {}: {:?}", ctx.game_version, ctx.meta);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::binder::{BindContext, UriBinder};
    use crate::engine::meta::EngineMeta;
    use crate::sources::VersionEntry;
    use crate::version::VersionId;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tower_lsp::lsp_types::Url;

    struct NoopBinder;

    impl UriBinder for NoopBinder {
        fn bind(&self, _uri: &Url, _ctx: &mut BindContext<'_>) -> Result<(), EngineFault> {
            Ok(())
        }
    }

    #[test]
    fn test_registers_all_extensions() {
        let version = VersionId::new("1.21.4");
        let initializer = DatapackInitializer {
            vanilla_mcdoc: Arc::new(json!({ "ref": "deadbeef", "mcdoc": {} })),
            summary: Arc::new(RegistrySummary::new(
                version.clone(),
                BTreeMap::new(),
                BTreeMap::new(),
            )),
            manifest: VersionManifest::new(vec![VersionEntry::new("1.21.4", 61, None)]),
            parent_symbol_categories: vec!["advancement".to_string()],
        };

        let mut meta = EngineMeta::new();
        let mut ctx = InitContext {
            game_version: &version,
            meta: &mut meta,
            default_binder: Arc::new(NoopBinder),
        };
        initializer.initialize(&mut ctx).unwrap();

        let sources: Vec<(&str, &str)> = meta
            .symbol_sources()
            .map(|(key, source)| (key, source.checksum.as_str()))
            .collect();
        assert_eq!(
            sources,
            vec![("mcmeta-summary", "1.21.4"), ("vanilla-mcdoc", "deadbeef")]
        );
        assert_eq!(meta.uri_binders().len(), 1);
        for name in ["since", "until", "deprecated", "pack_format"] {
            assert!(meta.attribute(name).is_some(), "missing attribute {}", name);
        }
    }
}
