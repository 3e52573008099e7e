use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::ProjectId;
use crate::model::image::{ImageError, ImageUpload, MAX_IMAGES_PER_UPLOAD};

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle status of a project.
///
/// The backend treats status as a free-form string; the two terminal values
/// it uses are `completed` and `finished`. Anything unrecognized is kept
/// verbatim so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Finished,
    Other(String),
}

impl ProjectStatus {
    /// Parse a backend status, treating a missing or blank value as active.
    #[must_use]
    pub fn from_backend(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Active,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "active" => Self::Active,
                "completed" => Self::Completed,
                "finished" => Self::Finished,
                _ => Self::Other(value.to_owned()),
            },
        }
    }

    /// True for the statuses that remove a project from the active listing.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Finished)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Finished => "finished",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── PROJECT ───────────────────────────────────────────────────────────────────
//

/// A construction site being monitored, in the client's canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub template_image_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub analyses_count: u32,
    pub latest_progress: f64,
    pub status: ProjectStatus,
}

impl Project {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProjectDraftError {
    #[error("project name is required")]
    EmptyName,

    #[error("at least one template image is required")]
    MissingTemplate,

    #[error("at most {max} template images per project, got {count}")]
    TooManyImages { count: usize, max: usize },

    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Raw input from the project creation form.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub template_images: Vec<ImageUpload>,
}

/// A project creation request that passed client-side checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    name: String,
    description: Option<String>,
    template_image: ImageUpload,
}

impl ProjectDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            template_images: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_template(mut self, image: ImageUpload) -> Self {
        self.template_images.push(image);
        self
    }

    /// Validate and normalize the draft.
    ///
    /// The backend stores a single template per project, so only the first
    /// picked image is uploaded.
    ///
    /// # Errors
    ///
    /// Returns `ProjectDraftError` if the name is blank or the template image
    /// count is outside `1..=10`.
    pub fn validate(self) -> Result<NewProject, ProjectDraftError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ProjectDraftError::EmptyName);
        }
        let count = self.template_images.len();
        if count > MAX_IMAGES_PER_UPLOAD {
            return Err(ProjectDraftError::TooManyImages {
                count,
                max: MAX_IMAGES_PER_UPLOAD,
            });
        }
        let template_image = self
            .template_images
            .into_iter()
            .next()
            .ok_or(ProjectDraftError::MissingTemplate)?;
        let description = self
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(NewProject {
            name,
            description,
            template_image,
        })
    }
}

impl NewProject {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn template_image(&self) -> &ImageUpload {
        &self.template_image
    }
}
