use site_core::model::Analysis;

use super::project_vm::progress_label;
use super::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisRowVm {
    pub id: String,
    pub project_id: String,
    pub created_label: String,
    pub progress_label: String,
    pub headline: String,
    pub has_pdf: bool,
}

impl From<&Analysis> for AnalysisRowVm {
    fn from(analysis: &Analysis) -> Self {
        Self {
            id: analysis.id.to_string(),
            project_id: analysis.project_id.to_string(),
            created_label: format_datetime(analysis.created_at),
            progress_label: progress_label(analysis.progress_percentage),
            headline: analysis
                .result
                .observations
                .first()
                .cloned()
                .unwrap_or_else(|| "No observations recorded".to_string()),
            has_pdf: analysis.pdf_available,
        }
    }
}

/// Newest first.
#[must_use]
pub fn map_analysis_rows(analyses: &[Analysis]) -> Vec<AnalysisRowVm> {
    let mut sorted: Vec<&Analysis> = analyses.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.into_iter().map(AnalysisRowVm::from).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisDetailVm {
    pub id: String,
    pub created_label: String,
    pub progress_label: String,
    pub observations: Vec<String>,
    pub recommendations: Vec<String>,
    pub issues: Vec<String>,
    pub next_steps: Vec<String>,
    pub image_count: usize,
    pub pdf_available: bool,
}

impl From<&Analysis> for AnalysisDetailVm {
    fn from(analysis: &Analysis) -> Self {
        let result = &analysis.result;
        Self {
            id: analysis.id.to_string(),
            created_label: format_datetime(analysis.created_at),
            progress_label: progress_label(analysis.progress_percentage),
            observations: result.observations.clone(),
            recommendations: result.recommendations.clone(),
            issues: result.issues_identified.clone(),
            next_steps: result.next_steps.clone(),
            image_count: analysis.current_images_paths.len(),
            pdf_available: analysis.pdf_available,
        }
    }
}
