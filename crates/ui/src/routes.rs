use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use services::SessionState;

use crate::context::AppContext;
use crate::session::use_session;
use crate::views::{
    AnalysisDetailView, CreateProjectView, DashboardView, LoginView, NotFoundView, NoticeBanner,
    ProjectDetailView, RegisterView,
};

#[derive(Clone, Routable, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[route("/register", RegisterView)] Register {},
    #[layout(Protected)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/projects/new", CreateProjectView)] CreateProject {},
        #[route("/projects/:project_id", ProjectDetailView)] ProjectDetail { project_id: String },
        #[route("/projects/:project_id/analyses/:analysis_id", AnalysisDetailView)]
        AnalysisDetail { project_id: String, analysis_id: String },
    #[end_layout]
    #[route("/:..segments", NotFoundView)] NotFound { segments: Vec<String> },
}

/// What a protected page should do for a given session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Wait,
    RedirectToLogin,
    Render,
}

#[must_use]
pub fn gate(state: &SessionState) -> Gate {
    match state {
        SessionState::Loading => Gate::Wait,
        SessionState::Unauthenticated => Gate::RedirectToLogin,
        SessionState::Authenticated(_) => Gate::Render,
    }
}

#[component]
fn Protected() -> Element {
    let session = use_session();
    let navigator = use_navigator();
    let decision = gate(&session.state.read());

    use_effect(move || {
        if gate(&session.state.read()) == Gate::RedirectToLogin {
            navigator.replace(Route::Login {});
        }
    });

    match decision {
        Gate::Wait => rsx! {
            div { class: "page page-centered",
                p { class: "muted", "Checking your session..." }
            }
        },
        Gate::RedirectToLogin => rsx! {},
        Gate::Render => rsx! {
            div { class: "app",
                Header {}
                main { class: "content",
                    NoticeBanner {}
                    Outlet::<Route> {}
                }
            }
        },
    }
}

#[component]
fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let navigator = use_navigator();
    let username = session
        .state
        .read()
        .user()
        .map(|user| user.username.clone())
        .unwrap_or_default();

    let on_logout = move |_| {
        let auth = ctx.auth();
        let mut state = session.state;
        spawn(async move {
            auth.logout().await;
            state.set(SessionState::Unauthenticated);
            session.dismiss();
            navigator.replace(Route::Login {});
        });
    };

    rsx! {
        header { class: "topbar",
            Link { class: "brand", to: Route::Dashboard {}, "Site Progress" }
            nav {
                Link { to: Route::Dashboard {}, "Projects" }
                Link { to: Route::CreateProject {}, "New project" }
            }
            div { class: "topbar-user",
                span { "{username}" }
                button { class: "btn btn-ghost", onclick: on_logout, "Log out" }
            }
        }
    }
}
