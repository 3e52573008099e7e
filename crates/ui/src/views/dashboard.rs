use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::session::use_session;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ProjectCardVm, map_project_cards};

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    active: Vec<ProjectCardVm>,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let projects = ctx.projects();
    let mut show_completed = use_signal(|| false);

    let mut resource = use_resource(move || {
        let projects = projects.clone();
        async move {
            let active = projects
                .list_active_projects()
                .await
                .map_err(|err| ViewError::Server(err.user_message("Could not load projects")))?;
            Ok(DashboardData {
                active: map_project_cards(&active),
            })
        }
    });

    let state = view_state_from_resource(&resource);
    let greeting = greeting(session.state.read().user().map(|user| user.username.as_str()));

    rsx! {
        div { class: "dashboard",
            section { class: "page",
                p { class: "greeting", "{greeting}" }
                div { class: "page-header",
                    h2 { "Active projects" }
                    div { class: "actions",
                        button {
                            class: "btn btn-ghost",
                            onclick: move |_| show_completed.toggle(),
                            if show_completed() { "Hide completed projects" } else { "Show completed projects" }
                        }
                        Link { class: "btn btn-primary", to: Route::CreateProject {}, "New project" }
                    }
                }

                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { class: "muted", "Loading projects..." }
                    },
                    ViewState::Ready(data) => rsx! {
                        if data.active.is_empty() {
                            div { class: "empty",
                                p { "No active projects." }
                                p { class: "muted", "Create a project to start tracking progress." }
                            }
                        } else {
                            ul { class: "project-grid",
                                for card in data.active {
                                    ProjectCard { key: "{card.id}", card }
                                }
                            }
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        div { class: "error-panel",
                            p { "{err.message()}" }
                            button { class: "btn", onclick: move |_| resource.restart(), "Retry" }
                        }
                    },
                }
            }
            if show_completed() {
                CompletedPanel {}
            }
        }
    }
}

fn greeting(username: Option<&str>) -> String {
    match username.map(str::trim) {
        Some(name) if !name.is_empty() => format!("Hello, {name}!"),
        _ => "Hello!".to_string(),
    }
}

#[component]
fn ProjectCard(card: ProjectCardVm) -> Element {
    let progress_style = format!("width: {:.0}%", card.progress_width);
    rsx! {
        li { class: "project-card",
            Link { to: Route::ProjectDetail { project_id: card.id.clone() },
                div { class: "card-header",
                    h3 { "{card.name}" }
                    span { class: "badge", "{card.status_label}" }
                }
                if !card.description.is_empty() {
                    p { class: "muted", "{card.description}" }
                }
                div { class: "progress",
                    div { class: "progress-bar", style: "{progress_style}" }
                }
                div { class: "project-meta",
                    span { class: "progress-label", "{card.progress_label}" }
                    span { "{card.analyses_label}" }
                    span { "{card.created_label}" }
                    span { "{card.updated_label}" }
                }
            }
        }
    }
}

#[component]
fn CompletedPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let projects = ctx.projects();

    let resource = use_resource(move || {
        let projects = projects.clone();
        async move {
            projects
                .list_completed_projects()
                .await
                .map(|completed| map_project_cards(&completed))
                .map_err(|err| ViewError::Server(err.user_message("Could not load projects")))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        aside { class: "completed-panel",
            h3 { "Completed" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { class: "muted", "No completed projects yet." }
                    } else {
                        ul {
                            for card in cards {
                                li { key: "{card.id}", class: "completed-item",
                                    Link { to: Route::ProjectDetail { project_id: card.id.clone() },
                                        span { "{card.name}" }
                                        span { class: "badge badge-done", "{card.progress_label}" }
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "muted", "{err.message()}" }
                },
            }
        }
    }
}
