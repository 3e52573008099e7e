use std::sync::Arc;

use tracing::{debug, info, warn};

use site_core::model::{Analysis, NewProject, Project, ProjectId};
use storage::repository::CompletionOverrideRepository;

use crate::Clock;
use crate::api::ApiClient;
use crate::error::ProjectServiceError;
use crate::overrides::apply_overrides;

/// How a finish request ended. Both variants count as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// The backend accepted the status change.
    Confirmed { message: Option<String> },
    /// The backend has no finish endpoint; the project is marked completed locally.
    RecordedLocally,
}

impl FinishOutcome {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            FinishOutcome::Confirmed {
                message: Some(message),
            } => message,
            FinishOutcome::Confirmed { message: None } => "Project finished",
            FinishOutcome::RecordedLocally => "Project marked as completed on this device",
        }
    }
}

/// Project listings and lifecycle, with local completion overrides applied.
#[derive(Clone)]
pub struct ProjectService {
    clock: Clock,
    api: Arc<ApiClient>,
    overrides: Arc<dyn CompletionOverrideRepository>,
}

impl ProjectService {
    #[must_use]
    pub fn new(
        clock: Clock,
        api: Arc<ApiClient>,
        overrides: Arc<dyn CompletionOverrideRepository>,
    ) -> Self {
        Self {
            clock,
            api,
            overrides,
        }
    }

    /// Projects still in progress, after overrides.
    ///
    /// # Errors
    ///
    /// Returns `ProjectServiceError` when the listing or the override store fails.
    pub async fn list_active_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        let mut projects = self.list_all_projects().await?;
        projects.retain(|project| !project.is_completed());
        Ok(projects)
    }

    /// Every project with overrides applied. Overrides the backend has caught
    /// up with are pruned from the store.
    ///
    /// # Errors
    ///
    /// Returns `ProjectServiceError` when the listing or the override store fails.
    pub async fn list_all_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        let now = self.clock.now();
        let projects = self
            .api
            .list_projects(Some(self.clock.now_millis()), now)
            .await?;
        let overrides = self.overrides.list_overrides().await?;
        if overrides.is_empty() {
            return Ok(projects);
        }

        let reconciled = apply_overrides(projects, &overrides);
        for id in &reconciled.settled {
            match self.overrides.remove_override(id).await {
                Ok(_) => debug!(project = %id, "backend caught up, dropped local override"),
                Err(err) => warn!(project = %id, error = %err, "could not drop settled override"),
            }
        }
        Ok(reconciled.projects)
    }

    /// Completed projects from the dedicated endpoint, or from the full
    /// listing when that endpoint fails. Projects finished only on this
    /// device are added to the endpoint's answer.
    ///
    /// # Errors
    ///
    /// Returns `ProjectServiceError` when the override store fails, or when
    /// the fallback listing fails too.
    pub async fn list_completed_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        match self.api.list_completed_projects(self.clock.now()).await {
            Ok(projects) => self.merge_local_completions(projects).await,
            Err(err) => {
                warn!(error = %err, "completed listing unavailable, filtering all projects");
                let mut projects = self.list_all_projects().await?;
                projects.retain(Project::is_completed);
                Ok(projects)
            }
        }
    }

    async fn merge_local_completions(
        &self,
        mut completed: Vec<Project>,
    ) -> Result<Vec<Project>, ProjectServiceError> {
        let overrides = self.overrides.list_overrides().await?;
        let missing: Vec<&ProjectId> = overrides
            .iter()
            .filter(|id| !completed.iter().any(|project| &project.id == *id))
            .collect();
        if missing.is_empty() {
            return Ok(completed);
        }

        let locally_finished: Vec<Project> = self
            .list_all_projects()
            .await?
            .into_iter()
            .filter(|project| project.is_completed() && missing.contains(&&project.id))
            .collect();
        debug!(count = locally_finished.len(), "merged locally finished projects");
        completed.extend(locally_finished);
        Ok(completed)
    }

    /// # Errors
    ///
    /// Returns `ProjectServiceError::NotFound` when no listed project has `id`.
    pub async fn find_project(&self, id: &ProjectId) -> Result<Project, ProjectServiceError> {
        self.list_all_projects()
            .await?
            .into_iter()
            .find(|project| &project.id == id)
            .ok_or_else(|| ProjectServiceError::NotFound(id.clone()))
    }

    /// Creates a project and returns the normalized record.
    ///
    /// # Errors
    ///
    /// Returns `ProjectServiceError::Api` when the upload is rejected or the
    /// response names no project.
    pub async fn create_project(
        &self,
        project: &NewProject,
    ) -> Result<Project, ProjectServiceError> {
        let created = self.api.create_project(project, self.clock.now()).await?;
        info!(project_name = project.name(), id = %created.id, "project created");
        Ok(created)
    }

    /// Marks a project finished. Backends without the finish endpoint (404 or
    /// 405) get a local override instead, which still counts as success.
    ///
    /// # Errors
    ///
    /// Returns `ProjectServiceError` for any other failure.
    pub async fn finish_project(
        &self,
        id: &ProjectId,
    ) -> Result<FinishOutcome, ProjectServiceError> {
        match self.api.finish_project(id).await {
            Ok(message) => {
                info!(project = %id, "project finished on backend");
                Ok(FinishOutcome::Confirmed { message })
            }
            Err(err) if err.is_unsupported_endpoint() => {
                let added = self
                    .overrides
                    .record_override(id, self.clock.now())
                    .await?;
                info!(project = %id, added, "finish endpoint unavailable, recorded local override");
                Ok(FinishOutcome::RecordedLocally)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `ProjectServiceError::Api` when the listing fails.
    pub async fn list_project_analyses(
        &self,
        id: &ProjectId,
    ) -> Result<Vec<Analysis>, ProjectServiceError> {
        Ok(self
            .api
            .list_project_analyses(id, self.clock.now())
            .await?)
    }
}
