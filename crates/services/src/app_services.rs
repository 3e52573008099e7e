use std::sync::Arc;
use std::time::Duration;

use storage::repository::Storage;

use crate::Clock;
use crate::analyses::AnalysisService;
use crate::api::{ApiClient, ApiConfig};
use crate::auth::AuthSession;
use crate::error::AppServicesError;
use crate::projects::ProjectService;

/// Assembles app-facing services over one storage backend and one API client.
#[derive(Clone)]
pub struct AppServices {
    auth: Arc<AuthSession>,
    projects: Arc<ProjectService>,
    analyses: Arc<AnalysisService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        api: ApiConfig,
        clock: Clock,
        pdf_settle: Duration,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, api, clock, pdf_settle)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::Api` if the HTTP client cannot be built.
    pub fn from_storage(
        storage: &Storage,
        api: ApiConfig,
        clock: Clock,
        pdf_settle: Duration,
    ) -> Result<Self, AppServicesError> {
        let client = Arc::new(ApiClient::new(api, Arc::clone(&storage.credentials))?);

        let auth = Arc::new(AuthSession::new(
            Arc::clone(&client),
            Arc::clone(&storage.credentials),
        ));
        let projects = Arc::new(ProjectService::new(
            clock,
            Arc::clone(&client),
            Arc::clone(&storage.overrides),
        ));
        let analyses =
            Arc::new(AnalysisService::new(clock, Arc::clone(&client)).with_pdf_settle(pdf_settle));

        Ok(Self {
            auth,
            projects,
            analyses,
        })
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
}
