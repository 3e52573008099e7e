use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::ProjectServiceError;
use site_core::model::{AnalysisDraft, AnalysisDraftError, ProjectId};

use super::picker::{confirm, pick_images};
use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{Notice, use_session};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AnalysisRowVm, ProjectDetailVm, map_analysis_rows};

#[derive(Clone, Debug, PartialEq)]
struct ProjectDetailData {
    project: ProjectDetailVm,
    analyses: Vec<AnalysisRowVm>,
}

/// Completed projects are read-only; the page sends the user back to the
/// dashboard instead of showing them.
#[derive(Clone, Debug, PartialEq)]
enum ProjectPage {
    Open(ProjectDetailData),
    AlreadyCompleted,
}

const ALREADY_COMPLETED: &str =
    "This project is already completed. You can find it among the completed projects.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Busy {
    None,
    Analyzing,
    Finishing,
}

fn view_error(err: &ProjectServiceError) -> ViewError {
    match err {
        ProjectServiceError::NotFound(_) => ViewError::NotFound,
        other => ViewError::Server(other.user_message("Could not load the project")),
    }
}

fn analysis_draft_message(err: AnalysisDraftError) -> String {
    match err {
        AnalysisDraftError::NoImages => "Choose at least one photo.".to_string(),
        AnalysisDraftError::TooManyImages { max, .. } => format!("Choose at most {max} photos."),
        other => other.to_string(),
    }
}

#[component]
pub fn ProjectDetailView(project_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let navigator = use_navigator();
    let projects = ctx.projects();
    let id = ProjectId::new(project_id.clone());

    let mut busy = use_signal(|| Busy::None);

    let resource_id = id.clone();
    let mut resource = use_resource(move || {
        let projects = projects.clone();
        let id = resource_id.clone();
        async move {
            let project = projects.find_project(&id).await.map_err(|e| view_error(&e))?;
            if project.is_completed() {
                return Ok(ProjectPage::AlreadyCompleted);
            }
            let analyses = projects
                .list_project_analyses(&id)
                .await
                .map_err(|e| view_error(&e))?;
            Ok(ProjectPage::Open(ProjectDetailData {
                project: ProjectDetailVm::from(&project),
                analyses: map_analysis_rows(&analyses),
            }))
        }
    });

    use_effect(move || {
        if let Some(Ok(ProjectPage::AlreadyCompleted)) = &*resource.read() {
            session.notify(Notice::info(ALREADY_COMPLETED));
            navigator.replace(Route::Dashboard {});
        }
    });

    let on_analyze = {
        let analyses = ctx.analyses();
        let id = id.clone();
        move |_| {
            let analyses = analyses.clone();
            let id = id.clone();
            spawn(async move {
                let picked = match pick_images("Choose today's progress photos").await {
                    Ok(picked) if picked.is_empty() => return,
                    Ok(picked) => picked,
                    Err(message) => {
                        session.notify(Notice::error(message));
                        return;
                    }
                };
                let draft = match AnalysisDraft::new(picked) {
                    Ok(draft) => draft,
                    Err(err) => {
                        session.notify(Notice::error(analysis_draft_message(err)));
                        return;
                    }
                };
                busy.set(Busy::Analyzing);
                session.notify(Notice::info("Analyzing photos. This can take a minute..."));
                match analyses.submit_analysis(&id, &draft).await {
                    Ok(analysis) => {
                        session.notify(Notice::success("Analysis complete."));
                        navigator.push(Route::AnalysisDetail {
                            project_id: id.to_string(),
                            analysis_id: analysis.id.to_string(),
                        });
                    }
                    Err(err) => {
                        session.notify(Notice::error(err.user_message("The analysis failed")));
                    }
                }
                busy.set(Busy::None);
            });
        }
    };

    let on_finish = {
        let projects = ctx.projects();
        let id = id.clone();
        move |_| {
            let projects = projects.clone();
            let id = id.clone();
            let name = match &*resource.read() {
                Some(Ok(ProjectPage::Open(data))) => data.project.card.name.clone(),
                _ => return,
            };
            spawn(async move {
                let question = format!(
                    "Finish \"{name}\"? It will move to the completed projects and stop accepting new analyses."
                );
                if !confirm("Finish project", question).await {
                    return;
                }
                busy.set(Busy::Finishing);
                match projects.finish_project(&id).await {
                    Ok(outcome) => {
                        session.notify(Notice::success(outcome.message()));
                        navigator.replace(Route::Dashboard {});
                    }
                    Err(err) => {
                        session.notify(Notice::error(
                            err.user_message("Could not finish the project"),
                        ));
                    }
                }
                busy.set(Busy::None);
            });
        }
    };

    let state = view_state_from_resource(&resource);
    let busy_now = busy();

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading project..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        p { "{err.message()}" }
                        button { class: "btn", onclick: move |_| resource.restart(), "Retry" }
                        Link { class: "btn btn-ghost", to: Route::Dashboard {}, "Back to projects" }
                    }
                },
                ViewState::Ready(ProjectPage::AlreadyCompleted) => rsx! {
                    p { class: "muted", "This project is completed. Returning to your projects..." }
                },
                ViewState::Ready(ProjectPage::Open(data)) => rsx! {
                    div { class: "page-header",
                        div {
                            h2 { "{data.project.card.name}" }
                            span { class: "badge", "{data.project.card.status_label}" }
                        }
                        div { class: "actions",
                            button {
                                class: "btn btn-primary",
                                disabled: busy_now != Busy::None,
                                onclick: on_analyze,
                                if busy_now == Busy::Analyzing { "Analyzing..." } else { "Upload progress photos" }
                            }
                            button {
                                class: "btn",
                                disabled: busy_now != Busy::None,
                                onclick: on_finish,
                                if busy_now == Busy::Finishing { "Finishing..." } else { "Finish project" }
                            }
                        }
                    }
                    if !data.project.card.description.is_empty() {
                        p { "{data.project.card.description}" }
                    }
                    dl { class: "facts",
                        dt { "Progress" }
                        dd { "{data.project.card.progress_label}" }
                        dt { "Created" }
                        dd { "{data.project.created_label}" }
                        dt { "Template image" }
                        dd { "{data.project.template_image_path}" }
                    }

                    h3 { "Analyses" }
                    if data.analyses.is_empty() {
                        p { class: "muted", "No analyses yet. Upload photos of the site to get the first one." }
                    } else {
                        ul { class: "analysis-list",
                            for row in data.analyses {
                                li { key: "{row.id}",
                                    Link {
                                        to: Route::AnalysisDetail {
                                            project_id: row.project_id.clone(),
                                            analysis_id: row.id.clone(),
                                        },
                                        span { class: "analysis-date", "{row.created_label}" }
                                        span { class: "progress-label", "{row.progress_label}" }
                                        span { class: "muted", "{row.headline}" }
                                        if row.has_pdf {
                                            span { class: "badge", "PDF" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
