use std::sync::Arc;

use crate::config::Config;
use crate::render::PageRenderer;
use crate::upload::UploadResolver;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing in it changes per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stores profile photos under `config.upload.dir`.
    pub uploads: Arc<UploadResolver>,
    /// Pluggable rendering layer. Default: JsonRenderer.
    pub renderer: Arc<dyn PageRenderer>,
}

impl AppState {
    pub fn new(config: Config, renderer: Arc<dyn PageRenderer>) -> Self {
        let uploads = Arc::new(UploadResolver::new(config.upload.clone()));
        Self {
            config,
            uploads,
            renderer,
        }
    }
}
