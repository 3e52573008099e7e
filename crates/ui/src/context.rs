use std::path::PathBuf;
use std::sync::Arc;

use services::{AnalysisService, AuthSession, ProjectService};

pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthSession>;
    fn projects(&self) -> Arc<ProjectService>;
    fn analyses(&self) -> Arc<AnalysisService>;

    /// Where downloaded report PDFs are written.
    fn download_dir(&self) -> PathBuf;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthSession>,
    projects: Arc<ProjectService>,
    analyses: Arc<AnalysisService>,
    download_dir: PathBuf,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            projects: app.projects(),
            analyses: app.analyses(),
            download_dir: app.download_dir(),
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthSession> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn projects(&self) -> Arc<ProjectService> {
        Arc::clone(&self.projects)
    }

    #[must_use]
    pub fn analyses(&self) -> Arc<AnalysisService> {
        Arc::clone(&self.analyses)
    }

    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
