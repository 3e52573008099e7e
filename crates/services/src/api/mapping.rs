//! Adapters from backend payloads to domain records.
//!
//! Each adapter owns the defaults for its payload type, so the rest of the
//! app only ever sees fully populated records.

use chrono::{DateTime, Utc};

use site_core::model::{
    Analysis, AnalysisId, AnalysisResult, PdfStatus, Project, ProjectId, ProjectStatus, User,
    UserId,
};
use site_core::time::parse_backend_timestamp;

use super::wire::{
    AnalysisContentWire, AnalysisWire, PdfStatusEnvelope, ProjectWire, UserWire,
};
use crate::error::ApiError;

/// Progress and status reported when a project payload carries none.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProjectDefaults {
    pub progress: f64,
    pub status: ProjectStatus,
}

impl ProjectDefaults {
    pub(crate) const LISTING: Self = Self {
        progress: 0.0,
        status: ProjectStatus::Active,
    };
    /// Projects from the completed listing are done unless they say otherwise.
    pub(crate) const COMPLETED: Self = Self {
        progress: 100.0,
        status: ProjectStatus::Completed,
    };
}

pub(crate) fn user_from_wire(wire: UserWire) -> Result<User, ApiError> {
    let id = wire
        .id
        .or(wire.mongo_id)
        .ok_or_else(|| ApiError::Malformed("user without an id".into()))?;
    Ok(User {
        id: UserId::new(id),
        username: wire.username.unwrap_or_default(),
        email: wire.email.unwrap_or_default(),
        role: wire.role.unwrap_or_default(),
    })
}

pub(crate) fn project_from_wire(
    wire: ProjectWire,
    defaults: &ProjectDefaults,
    now: DateTime<Utc>,
) -> Result<Project, ApiError> {
    let id = wire
        .mongo_id
        .or(wire.id)
        .ok_or_else(|| ApiError::Malformed("project without an id".into()))?;
    let created_at = timestamp_or(wire.created_at.as_deref(), now);
    let updated_at = wire
        .updated_at
        .as_deref()
        .and_then(parse_backend_timestamp)
        .unwrap_or(created_at);

    Ok(Project {
        id: ProjectId::new(id),
        name: wire.name.unwrap_or_default().trim().to_owned(),
        description: wire
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty()),
        template_image_path: wire.template_image_path.unwrap_or_default(),
        created_at,
        updated_at,
        analyses_count: wire.analyses_count.map_or(0, count_from_f64),
        latest_progress: wire.latest_progress.unwrap_or(defaults.progress),
        status: match wire.status.as_deref().map(str::trim) {
            None | Some("") => defaults.status.clone(),
            raw => ProjectStatus::from_backend(raw),
        },
    })
}

pub(crate) fn analysis_from_wire(
    wire: AnalysisWire,
    fallback_project: Option<&ProjectId>,
    now: DateTime<Utc>,
) -> Result<Analysis, ApiError> {
    let id = wire
        .id
        .or(wire.mongo_id)
        .map(AnalysisId::new)
        .ok_or_else(|| ApiError::Malformed("analysis without an id".into()))?;
    let project_id = wire
        .project_id
        .map(ProjectId::new)
        .or_else(|| fallback_project.cloned())
        .ok_or_else(|| ApiError::Malformed(format!("analysis {id} without a project id")))?;

    let result = wire.content.map(result_from_wire).unwrap_or_default();
    let pdf_generated = wire.pdf_generated.unwrap_or(false);
    let pdf_path = pdf_generated.then(|| Analysis::report_path(&id));

    Ok(Analysis {
        created_at: timestamp_or(wire.created_at.as_deref(), now),
        progress_percentage: result.progress_percentage,
        current_images_paths: wire.current_images_paths.unwrap_or_default(),
        pdf_available: pdf_generated,
        pdf_path,
        result,
        project_id,
        id,
    })
}

fn result_from_wire(content: AnalysisContentWire) -> AnalysisResult {
    let observations = content
        .observations
        .or_else(|| content.summary.map(|s| vec![s]))
        .unwrap_or_default();
    let issues_identified = content
        .issues_identified
        .or_else(|| content.risk_assessment.map(|r| vec![r]))
        .unwrap_or_default();

    AnalysisResult {
        progress_percentage: content.progress_percentage.unwrap_or(0.0),
        observations,
        recommendations: content.recommendations.unwrap_or_default(),
        issues_identified,
        next_steps: content.next_steps.unwrap_or_default(),
    }
}

pub(crate) fn pdf_status_from_wire(envelope: PdfStatusEnvelope) -> PdfStatus {
    envelope
        .pdf_status
        .map_or_else(PdfStatus::unavailable, |status| PdfStatus {
            exists: status.pdf_generated.unwrap_or(false),
            ready: status.download_available.unwrap_or(false),
        })
}

fn timestamp_or(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(parse_backend_timestamp).unwrap_or(fallback)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_from_f64(value: f64) -> u32 {
    value.clamp(0.0, f64::from(u32::MAX)) as u32
}
