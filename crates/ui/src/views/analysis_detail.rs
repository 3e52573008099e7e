use dioxus::prelude::*;
use dioxus_router::Link;
use site_core::model::{AnalysisId, ProjectId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{Notice, use_session};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::AnalysisDetailVm;

#[component]
pub fn AnalysisDetailView(project_id: String, analysis_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let analyses = ctx.analyses();
    let id = AnalysisId::new(analysis_id.clone());

    let mut downloading = use_signal(|| false);

    let resource_id = id.clone();
    let owner = ProjectId::new(project_id.clone());
    let mut resource = use_resource(move || {
        let analyses = analyses.clone();
        let id = resource_id.clone();
        let owner = owner.clone();
        async move {
            analyses
                .get_analysis(Some(&owner), &id)
                .await
                .map(|analysis| AnalysisDetailVm::from(&analysis))
                .map_err(|err| ViewError::Server(err.user_message("Could not load the analysis")))
        }
    });

    let on_download = {
        let analyses = ctx.analyses();
        let dir = ctx.download_dir();
        move |_| {
            let analyses = analyses.clone();
            let dir = dir.clone();
            let id = id.clone();
            spawn(async move {
                downloading.set(true);
                session.notify(Notice::info("Preparing the PDF report..."));
                match analyses.save_report(&id, &dir).await {
                    Ok(path) => {
                        session.notify(Notice::success(format!(
                            "Report saved to {}",
                            path.display()
                        )));
                        resource.restart();
                    }
                    Err(err) => {
                        session.notify(Notice::error(
                            err.user_message("Could not download the report"),
                        ));
                    }
                }
                downloading.set(false);
            });
        }
    };

    let state = view_state_from_resource(&resource);
    let back = Route::ProjectDetail { project_id };

    rsx! {
        div { class: "page",
            div { class: "page-header",
                h2 { "Progress analysis" }
                Link { class: "btn btn-ghost", to: back, "Back to project" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading analysis..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        p { "{err.message()}" }
                        button { class: "btn", onclick: move |_| resource.restart(), "Retry" }
                    }
                },
                ViewState::Ready(vm) => rsx! {
                    div { class: "analysis-summary",
                        span { class: "progress-label big", "{vm.progress_label}" }
                        span { class: "muted", "{vm.created_label}" }
                        span { class: "muted", "{vm.image_count} photo(s)" }
                        if vm.pdf_available {
                            span { class: "badge", "PDF ready" }
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: downloading(),
                        onclick: on_download,
                        if downloading() { "Downloading..." } else { "Download PDF report" }
                    }
                    Section { title: "Observations", items: vm.observations }
                    Section { title: "Recommendations", items: vm.recommendations }
                    Section { title: "Issues identified", items: vm.issues }
                    Section { title: "Next steps", items: vm.next_steps }
                },
            }
        }
    }
}

#[component]
fn Section(title: &'static str, items: Vec<String>) -> Element {
    rsx! {
        section { class: "analysis-section",
            h3 { "{title}" }
            if items.is_empty() {
                p { class: "muted", "Nothing reported." }
            } else {
                ul {
                    for (index, item) in items.iter().enumerate() {
                        li { key: "{index}", "{item}" }
                    }
                }
            }
        }
    }
}
