//! Validation Pipeline
//!
//! Drives one validation call end to end:
//!
//! ```text
//! Init -> WorkspaceReady -> EngineReady -> DocumentSubmitted -> Checked -> Closed
//! ```
//!
//! Any step may fail instead, which ends the call in `Failed`. The workspace
//! acquired for the call is released on every path, and the engine is closed
//! whenever it was started.

use std::sync::Arc;

use crate::config::Config;
use crate::core::{DocumentLocation, ErrorFormatter, Workspace, WorkspaceManager};
use crate::engine::fault::CapturedFaults;
use crate::engine::{
    DatapackInitializer, EngineLauncher, FaultListener, FaultReporter, ProjectOptions,
    SchemaEngine,
};
use crate::resolver::{Resolution, Selector, VersionResolver};
use crate::sources::{DataSource, FetchError, McmetaClient, RegistrySummary};

use super::error::PipelineError;
use super::result::{ValidationRequest, ValidationResult};

/// Language id documents are submitted with
const DOCUMENT_LANGUAGE: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    WorkspaceReady,
    EngineReady,
    DocumentSubmitted,
    Checked,
    Closed,
    Failed,
}

/// Current state of one call, with each transition logged
#[derive(Debug)]
struct Progress {
    state: PipelineState,
}

impl Progress {
    fn new() -> Self {
        Self {
            state: PipelineState::Init,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        log::debug!("Pipeline {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

pub struct ValidationPipeline {
    config: Config,
    source: Arc<dyn DataSource>,
    launcher: Arc<dyn EngineLauncher>,
    workspaces: WorkspaceManager,
    formatter: ErrorFormatter,
}

impl ValidationPipeline {
    pub fn new(
        config: Config,
        source: Arc<dyn DataSource>,
        launcher: Arc<dyn EngineLauncher>,
    ) -> Self {
        let workspaces = WorkspaceManager::new(&config);
        Self {
            config,
            source,
            launcher,
            workspaces,
            formatter: ErrorFormatter::new(),
        }
    }

    /// Pipeline fetching its remote data over HTTP from the configured services
    pub fn with_http_source(
        config: Config,
        launcher: Arc<dyn EngineLauncher>,
    ) -> Result<Self, FetchError> {
        let source = Arc::new(McmetaClient::new(&config)?);
        Ok(Self::new(config, source, launcher))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate one document. Never fails: every problem becomes an invalid
    /// result carrying a single explanatory message.
    pub async fn validate(&self, request: &ValidationRequest) -> ValidationResult {
        let mut progress = Progress::new();

        match self.run(request, &mut progress).await {
            Ok(errors) => {
                log::info!(
                    "Validated {} document: {} diagnostic(s)",
                    request.category,
                    errors.len()
                );
                ValidationResult::from_diagnostics(errors)
            }
            Err(e) => {
                progress.advance(PipelineState::Failed);
                log::info!("Validation of {} document failed: {}", request.category, e);
                ValidationResult::failure(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        request: &ValidationRequest,
        progress: &mut Progress,
    ) -> Result<Vec<String>, PipelineError> {
        let selector =
            Selector::from_parts(request.version.as_deref(), request.pack_format.as_ref())?;
        let resolution = VersionResolver::new(self.source.as_ref())
            .resolve(&selector)
            .await?;

        let pack_format = selector
            .pack_format()
            .and_then(|format| format.descriptor_major())
            .unwrap_or(self.config.default_pack_format);
        let workspace = self.workspaces.acquire(pack_format).await?;
        progress.advance(PipelineState::WorkspaceReady);

        let outcome = self
            .check_in_workspace(&workspace, request, &resolution, progress)
            .await;

        self.workspaces.release(workspace).await;
        if outcome.is_ok() {
            progress.advance(PipelineState::Closed);
        }
        outcome
    }

    /// Everything that happens while the workspace exists. The fault
    /// listener lives exactly as long as this call.
    async fn check_in_workspace(
        &self,
        workspace: &Workspace,
        request: &ValidationRequest,
        resolution: &Resolution,
        progress: &mut Progress,
    ) -> Result<Vec<String>, PipelineError> {
        let (listener, reporter) = FaultListener::install();

        let outcome = self
            .run_engine(workspace, request, resolution, reporter, progress)
            .await;

        log_faults(listener.detach());
        outcome
    }

    async fn run_engine(
        &self,
        workspace: &Workspace,
        request: &ValidationRequest,
        resolution: &Resolution,
        reporter: FaultReporter,
        progress: &mut Progress,
    ) -> Result<Vec<String>, PipelineError> {
        let version = &resolution.version.id;

        let (summary, vanilla_mcdoc) = tokio::try_join!(
            RegistrySummary::fetch(self.source.as_ref(), version),
            self.source.vanilla_mcdoc(),
        )?;

        let initializer = DatapackInitializer {
            vanilla_mcdoc: Arc::new(vanilla_mcdoc),
            summary: Arc::new(summary),
            manifest: resolution.manifest.clone(),
            parent_symbol_categories: self.config.parent_symbol_categories.clone(),
        };
        let options = ProjectOptions {
            project_roots: vec![workspace.root_uri().clone()],
            cache_root: workspace.cache_uri().clone(),
            game_version: version.clone(),
            faults: reporter,
        };

        let mut engine = self
            .launcher
            .launch(options, vec![Box::new(initializer)])
            .await
            .map_err(PipelineError::Engine)?;
        progress.advance(PipelineState::EngineReady);

        let outcome = self
            .check_document(engine.as_mut(), workspace, request, resolution, progress)
            .await;

        if let Err(e) = engine.close().await {
            log::warn!("Failed to close schema engine: {}", e);
        }
        outcome
    }

    async fn check_document(
        &self,
        engine: &mut dyn SchemaEngine,
        workspace: &Workspace,
        request: &ValidationRequest,
        resolution: &Resolution,
        progress: &mut Progress,
    ) -> Result<Vec<String>, PipelineError> {
        let location = DocumentLocation::locate(
            workspace.root_uri(),
            &request.category,
            &resolution.version.id,
        )?;
        log::debug!("Submitting document at {}", location.uri);

        engine
            .submit_document(&location.uri, DOCUMENT_LANGUAGE, 1, &request.content)
            .await
            .map_err(|e| PipelineError::Document(e.to_string()))?;
        progress.advance(PipelineState::DocumentSubmitted);

        let checked = engine
            .fully_checked(&location.uri)
            .await
            .map_err(PipelineError::Check)?
            .ok_or(PipelineError::Unchecked)?;
        progress.advance(PipelineState::Checked);

        Ok(self.formatter.format_all(checked.node.errors()))
    }
}

fn log_faults(captured: CapturedFaults) {
    for fault in &captured.known_defects {
        log::debug!("Discarded parent symbol fault: {}", fault);
    }
    for fault in &captured.other {
        log::warn!("Ignoring schema engine fault: {}", fault);
    }
}
