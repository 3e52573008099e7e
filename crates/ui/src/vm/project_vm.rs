use site_core::model::Project;

use super::time_fmt::{format_date, format_datetime};

/// Whole-percent label, e.g. `"45%"`. Out-of-range values are clamped.
#[must_use]
pub fn progress_label(progress: f64) -> String {
    format!("{:.0}%", clamp_progress(progress))
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectCardVm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub progress_label: String,
    /// CSS width for the progress bar, `0.0..=100.0`.
    pub progress_width: f64,
    pub analyses_label: String,
    pub created_label: String,
    pub updated_label: String,
    pub status_label: String,
    pub is_completed: bool,
}

impl From<&Project> for ProjectCardVm {
    fn from(project: &Project) -> Self {
        let analyses_label = match project.analyses_count {
            0 => "No analyses yet".to_string(),
            1 => "1 analysis".to_string(),
            n => format!("{n} analyses"),
        };
        Self {
            id: project.id.to_string(),
            name: display_name(project),
            description: project.description.clone().unwrap_or_default(),
            progress_label: progress_label(project.latest_progress),
            progress_width: clamp_progress(project.latest_progress),
            analyses_label,
            created_label: format!("Created {}", format_date(project.created_at)),
            updated_label: format!("Updated {}", format_date(project.updated_at)),
            status_label: status_label(project),
            is_completed: project.is_completed(),
        }
    }
}

#[must_use]
pub fn map_project_cards(projects: &[Project]) -> Vec<ProjectCardVm> {
    projects.iter().map(ProjectCardVm::from).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectDetailVm {
    pub card: ProjectCardVm,
    pub created_label: String,
    pub template_image_path: String,
}

impl From<&Project> for ProjectDetailVm {
    fn from(project: &Project) -> Self {
        Self {
            card: ProjectCardVm::from(project),
            created_label: format_datetime(project.created_at),
            template_image_path: project.template_image_path.clone(),
        }
    }
}

fn display_name(project: &Project) -> String {
    if project.name.is_empty() {
        "Untitled project".to_string()
    } else {
        project.name.clone()
    }
}

fn status_label(project: &Project) -> String {
    if project.is_completed() {
        "Completed".to_string()
    } else {
        let raw = project.status.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Active".to_string(),
        }
    }
}
