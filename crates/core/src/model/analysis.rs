use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{AnalysisId, ProjectId};
use crate::model::image::{ImageUpload, MAX_IMAGES_PER_UPLOAD};

/// The AI-generated findings attached to an analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisResult {
    pub progress_percentage: f64,
    pub observations: Vec<String>,
    pub recommendations: Vec<String>,
    pub issues_identified: Vec<String>,
    pub next_steps: Vec<String>,
}

/// A single progress analysis of a project.
///
/// `progress_percentage` mirrors `result.progress_percentage`; both are kept
/// because list and detail screens read them from different places.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub id: AnalysisId,
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
    pub progress_percentage: f64,
    pub result: AnalysisResult,
    pub current_images_paths: Vec<String>,
    pub pdf_path: Option<String>,
    pub pdf_available: bool,
}

impl Analysis {
    /// Backend path of the rendered report for `id`.
    #[must_use]
    pub fn report_path(id: &AnalysisId) -> String {
        format!("/analyses/{id}/download-pdf")
    }

    /// Record a fresh PDF status check.
    pub fn apply_pdf_status(&mut self, status: PdfStatus) {
        self.pdf_available = status.is_downloadable();
        self.pdf_path = self.pdf_available.then(|| Self::report_path(&self.id));
    }
}

/// Whether the backend has rendered a report PDF for an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PdfStatus {
    pub exists: bool,
    pub ready: bool,
}

impl PdfStatus {
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_downloadable(self) -> bool {
        self.exists && self.ready
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnalysisDraftError {
    #[error("select at least one current image")]
    NoImages,

    #[error("at most {max} images per analysis, got {count}")]
    TooManyImages { count: usize, max: usize },
}

/// Images submitted for a new analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDraft {
    images: Vec<ImageUpload>,
}

impl AnalysisDraft {
    /// # Errors
    ///
    /// Returns `AnalysisDraftError` unless there are between 1 and 10 images.
    pub fn new(images: Vec<ImageUpload>) -> Result<Self, AnalysisDraftError> {
        if images.is_empty() {
            return Err(AnalysisDraftError::NoImages);
        }
        if images.len() > MAX_IMAGES_PER_UPLOAD {
            return Err(AnalysisDraftError::TooManyImages {
                count: images.len(),
                max: MAX_IMAGES_PER_UPLOAD,
            });
        }
        Ok(Self { images })
    }

    #[must_use]
    pub fn images(&self) -> &[ImageUpload] {
        &self.images
    }
}
