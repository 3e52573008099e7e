//! Local "completed" overrides layered over backend project listings.

use std::collections::HashSet;

use site_core::model::{Project, ProjectId, ProjectStatus};

/// Listing after overrides were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub projects: Vec<Project>,
    /// Overrides the backend has caught up with; safe to forget.
    pub settled: Vec<ProjectId>,
}

/// Forces overridden projects to completed.
///
/// A project the backend already reports as completed or finished keeps its
/// server status and its override is reported as settled. Overrides for ids
/// absent from the listing are left alone.
#[must_use]
pub fn apply_overrides(mut projects: Vec<Project>, overrides: &[ProjectId]) -> Reconciled {
    let pending: HashSet<&ProjectId> = overrides.iter().collect();
    let mut settled = Vec::new();

    for project in &mut projects {
        if !pending.contains(&project.id) {
            continue;
        }
        if project.status.is_terminal() {
            settled.push(project.id.clone());
        } else {
            project.status = ProjectStatus::Completed;
        }
    }

    Reconciled { projects, settled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_core::time::fixed_now;

    fn project(id: &str, status: ProjectStatus) -> Project {
        Project {
            id: ProjectId::new(id),
            name: format!("Obra {id}"),
            description: None,
            template_image_path: String::new(),
            created_at: fixed_now(),
            updated_at: fixed_now(),
            analyses_count: 0,
            latest_progress: 0.0,
            status,
        }
    }

    #[test]
    fn override_forces_completed() {
        let out = apply_overrides(
            vec![project("p1", ProjectStatus::Active)],
            &[ProjectId::new("p1")],
        );
        assert_eq!(out.projects[0].status, ProjectStatus::Completed);
        assert!(out.settled.is_empty());
    }

    #[test]
    fn server_terminal_status_wins_and_settles_override() {
        let out = apply_overrides(
            vec![project("p1", ProjectStatus::Finished)],
            &[ProjectId::new("p1")],
        );
        assert_eq!(out.projects[0].status, ProjectStatus::Finished);
        assert_eq!(out.settled, vec![ProjectId::new("p1")]);
    }

    #[test]
    fn projects_without_override_keep_server_status() {
        let out = apply_overrides(
            vec![
                project("p1", ProjectStatus::Active),
                project("p2", ProjectStatus::Other("paused".into())),
            ],
            &[ProjectId::new("elsewhere")],
        );
        assert_eq!(out.projects[0].status, ProjectStatus::Active);
        assert_eq!(out.projects[1].status, ProjectStatus::Other("paused".into()));
        assert!(out.settled.is_empty());
    }
}
