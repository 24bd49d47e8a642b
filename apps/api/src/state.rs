use std::sync::Arc;

use crate::capture::PdfCapture;
use crate::resume::service::ArtifactSettings;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Postgres in production, in-memory for local runs and tests.
    pub store: Arc<dyn ResumeStore>,
    /// Pluggable PDF backend. Default: headless Chromium.
    pub capture: Arc<dyn PdfCapture>,
    pub artifacts: ArtifactSettings,
}
