use std::sync::Arc;

use crate::comparison::pipeline::ComparisonPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The pool and config live inside the pipeline's stores and the startup
/// code; handlers only ever reach the orchestrator.
#[derive(Clone)]
pub struct AppState {
    /// The comparison orchestrator with its catalog store, cache and model
    /// gateway wired in at startup.
    pub pipeline: Arc<ComparisonPipeline>,
}
