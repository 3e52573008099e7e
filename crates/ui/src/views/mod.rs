mod analysis_detail;
mod create_project;
mod dashboard;
mod login;
mod not_found;
mod notice;
mod picker;
mod project_detail;
mod register;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use analysis_detail::AnalysisDetailView;
pub use create_project::CreateProjectView;
pub use dashboard::DashboardView;
pub use login::LoginView;
pub use not_found::NotFoundView;
pub use notice::NoticeBanner;
pub use project_detail::ProjectDetailView;
pub use register::RegisterView;
pub use state::{ViewError, ViewState, view_state_from_resource};
