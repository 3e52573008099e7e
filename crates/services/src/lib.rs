#![forbid(unsafe_code)]

pub mod analyses;
pub mod api;
pub mod app_services;
pub mod auth;
pub mod error;
pub mod images;
pub mod overrides;
pub mod projects;

pub use site_core::Clock;

pub use analyses::{AnalysisService, DEFAULT_PDF_SETTLE, report_file_name};
pub use api::{ApiClient, ApiConfig, AuthResponse};
pub use app_services::AppServices;
pub use auth::{AuthFailure, AuthSession, SessionState};
pub use error::{
    AnalysisServiceError, ApiError, AppServicesError, ImageLoadError, ProjectServiceError,
};
pub use images::{load_image, load_images};
pub use projects::{FinishOutcome, ProjectService};
