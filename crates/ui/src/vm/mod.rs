mod analysis_vm;
mod project_vm;
mod time_fmt;

pub use analysis_vm::{AnalysisDetailVm, AnalysisRowVm, map_analysis_rows};
pub use project_vm::{ProjectCardVm, ProjectDetailVm, map_project_cards, progress_label};
pub use time_fmt::{format_date, format_datetime};
