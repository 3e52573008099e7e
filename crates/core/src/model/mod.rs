mod analysis;
mod ids;
mod image;
mod project;
mod user;

pub use ids::{AnalysisId, ParseIdError, ProjectId, UserId};
pub use image::{ImageError, ImageUpload, MAX_IMAGE_BYTES, MAX_IMAGES_PER_UPLOAD};

pub use analysis::{Analysis, AnalysisDraft, AnalysisDraftError, AnalysisResult, PdfStatus};
pub use project::{NewProject, Project, ProjectDraft, ProjectDraftError, ProjectStatus};
pub use user::{Credentials, CredentialsError, Registration, RegistrationDraft, User};
