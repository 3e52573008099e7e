use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use site_core::model::{Analysis, AnalysisDraft, AnalysisId, PdfStatus, ProjectId};

use crate::Clock;
use crate::api::ApiClient;
use crate::error::AnalysisServiceError;

/// How long the backend gets to render a PDF before its status is rechecked.
pub const DEFAULT_PDF_SETTLE: Duration = Duration::from_secs(2);

/// Analysis submission, retrieval and report PDFs.
#[derive(Clone)]
pub struct AnalysisService {
    clock: Clock,
    api: Arc<ApiClient>,
    pdf_settle: Duration,
}

impl AnalysisService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<ApiClient>) -> Self {
        Self {
            clock,
            api,
            pdf_settle: DEFAULT_PDF_SETTLE,
        }
    }

    #[must_use]
    pub fn with_pdf_settle(mut self, settle: Duration) -> Self {
        self.pdf_settle = settle;
        self
    }

    /// # Errors
    ///
    /// Returns `AnalysisServiceError::Api` when the upload is rejected.
    pub async fn submit_analysis(
        &self,
        project_id: &ProjectId,
        draft: &AnalysisDraft,
    ) -> Result<Analysis, AnalysisServiceError> {
        let analysis = self
            .api
            .submit_analysis(project_id, draft.images(), self.clock.now())
            .await?;
        info!(
            project = %project_id,
            analysis = %analysis.id,
            images = draft.images().len(),
            progress = analysis.progress_percentage,
            "analysis submitted"
        );
        Ok(analysis)
    }

    /// # Errors
    ///
    /// Returns `AnalysisServiceError::Api` when the backend call fails.
    pub async fn list_project_analyses(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Analysis>, AnalysisServiceError> {
        Ok(self
            .api
            .list_project_analyses(project_id, self.clock.now())
            .await?)
    }

    /// Loads an analysis and refreshes its PDF availability. `project_id` is
    /// used when the backend record does not name its project.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisServiceError::Api` when the analysis cannot be loaded.
    pub async fn get_analysis(
        &self,
        project_id: Option<&ProjectId>,
        id: &AnalysisId,
    ) -> Result<Analysis, AnalysisServiceError> {
        let mut analysis = self
            .api
            .get_analysis(id, project_id, self.clock.now())
            .await?;
        analysis.apply_pdf_status(self.pdf_status(id).await);
        Ok(analysis)
    }

    /// Any failure reads as "no PDF yet".
    pub async fn pdf_status(&self, id: &AnalysisId) -> PdfStatus {
        match self.api.pdf_status(id).await {
            Ok(status) => status,
            Err(err) => {
                warn!(analysis = %id, error = %err, "pdf status check failed");
                PdfStatus::unavailable()
            }
        }
    }

    /// # Errors
    ///
    /// Returns `AnalysisServiceError::Api` when generation is rejected.
    pub async fn generate_pdf(&self, id: &AnalysisId) -> Result<Vec<u8>, AnalysisServiceError> {
        Ok(self.api.generate_pdf(id).await?)
    }

    /// # Errors
    ///
    /// Returns `AnalysisServiceError::Api` when the download fails.
    pub async fn download_pdf(&self, id: &AnalysisId) -> Result<Vec<u8>, AnalysisServiceError> {
        Ok(self.api.download_pdf(id).await?)
    }

    /// Writes the report PDF to `dir/analysis_<id>.pdf`, asking the backend to
    /// render it first when it is not yet available.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisServiceError::PdfNotReady` when the PDF is still
    /// unavailable after generation, and `Save` when the file cannot be written.
    pub async fn save_report(
        &self,
        id: &AnalysisId,
        dir: &Path,
    ) -> Result<PathBuf, AnalysisServiceError> {
        if !self.pdf_status(id).await.is_downloadable() {
            info!(analysis = %id, "generating report pdf");
            self.generate_pdf(id).await?;
            tokio::time::sleep(self.pdf_settle).await;
            if !self.pdf_status(id).await.is_downloadable() {
                return Err(AnalysisServiceError::PdfNotReady);
            }
        }

        let bytes = self.download_pdf(id).await?;
        let path = dir.join(report_file_name(id));
        write_file(&path, &bytes).await?;
        info!(analysis = %id, path = %path.display(), bytes = bytes.len(), "report saved");
        Ok(path)
    }
}

#[must_use]
pub fn report_file_name(id: &AnalysisId) -> String {
    let safe: String = id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("analysis_{safe}.pdf")
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), AnalysisServiceError> {
    let save_err = |source| AnalysisServiceError::Save {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(save_err)?;
    }
    tokio::fs::write(path, bytes).await.map_err(save_err)
}
