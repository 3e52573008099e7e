use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router as HttpRouter};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use serde_json::{Value, json};
use services::{AnalysisService, ApiConfig, AppServices, AuthSession, Clock, ProjectService};
use site_core::model::{User, UserId};
use site_core::time::fixed_now;
use storage::repository::{CredentialRepository, Storage};
use tokio::net::TcpListener;

use crate::context::{UiApp, build_app_context};
use crate::session::SessionProvider;
use crate::views::{AnalysisDetailView, DashboardView, LoginView, ProjectDetailView};

/// Canned backend answers for one view test.
#[derive(Clone)]
pub struct Backend {
    pub projects: Value,
    pub projects_status: StatusCode,
    pub completed: Value,
    pub project_analyses: Value,
    pub analysis: Value,
    pub pdf_generated: bool,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            projects: json!({ "projects": [] }),
            projects_status: StatusCode::OK,
            completed: json!({ "projects": [] }),
            project_analyses: json!({ "analyses": [] }),
            analysis: json!({}),
            pdf_generated: false,
        }
    }
}

type Shared = Arc<Mutex<Backend>>;

async fn spawn_backend(backend: Backend) -> String {
    let shared: Shared = Arc::new(Mutex::new(backend));
    let app = HttpRouter::new()
        .route("/auth/verify", get(|| async { Json(json!({ "valid": true })) }))
        .route("/api/projects", get(projects))
        .route("/api/projects/completed", get(completed))
        .route("/api/projects/:id/analyses", get(project_analyses))
        .route("/api/analyses/:id", get(analysis))
        .route("/api/analyses/:id/pdf-status", get(pdf_status))
        .with_state(shared);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind backend");
    let addr = listener.local_addr().expect("backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve backend");
    });
    format!("http://{addr}")
}

async fn projects(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let state = state.lock().expect("state");
    if state.projects_status.is_success() {
        (StatusCode::OK, Json(state.projects.clone()))
    } else {
        (
            state.projects_status,
            Json(json!({ "message": "Servidor indisponível" })),
        )
    }
}

async fn completed(State(state): State<Shared>) -> Json<Value> {
    Json(state.lock().expect("state").completed.clone())
}

async fn project_analyses(State(state): State<Shared>, Path(_id): Path<String>) -> Json<Value> {
    Json(state.lock().expect("state").project_analyses.clone())
}

async fn analysis(State(state): State<Shared>, Path(_id): Path<String>) -> Json<Value> {
    Json(state.lock().expect("state").analysis.clone())
}

async fn pdf_status(State(state): State<Shared>, Path(_id): Path<String>) -> Json<Value> {
    let ready = state.lock().expect("state").pdf_generated;
    Json(json!({ "pdf_status": { "pdf_generated": ready, "download_available": ready } }))
}

pub fn project_json(id: &str, status: &str, progress: f64) -> Value {
    json!({
        "_id": id,
        "name": format!("Obra {id}"),
        "description": "Estação Central",
        "template_image_path": format!("/uploads/{id}.png"),
        "created_at": "2025-10-14T19:43:57Z",
        "analyses_count": 1,
        "latest_progress": progress,
        "status": status
    })
}

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<AuthSession> {
        self.services.auth()
    }

    fn projects(&self) -> Arc<ProjectService> {
        self.services.projects()
    }

    fn analyses(&self) -> Arc<AnalysisService> {
        self.services.analyses()
    }

    fn download_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    Login,
    Dashboard,
    ProjectDetail(String),
    AnalysisDetail(String, String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! {
        SessionProvider {
            Router::<TestRoute> {}
        }
    }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::ProjectDetail(project_id) => rsx! { ProjectDetailView { project_id } },
        ViewKind::AnalysisDetail(project_id, analysis_id) => rsx! {
            AnalysisDetailView { project_id, analysis_id }
        },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drives pending tasks until the rendered HTML contains `needle`.
    pub async fn render_until(&mut self, needle: &str) -> String {
        for _ in 0..100 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Spawns a backend with `backend`'s answers and mounts `view` over it.
/// With `signed_in`, the session is restored before the first render.
pub async fn setup_view_harness(view: ViewKind, backend: Backend, signed_in: bool) -> ViewHarness {
    let base_url = spawn_backend(backend).await;
    let storage = Storage::in_memory();
    if signed_in {
        let user = User {
            id: UserId::new("u1"),
            username: "ana".into(),
            email: "ana@obra.example".into(),
            role: "engineer".into(),
        };
        storage
            .credentials
            .save_session("tok-1", &user)
            .await
            .expect("seed session");
    }
    let config = ApiConfig::new(&base_url, Duration::from_secs(5)).expect("api config");
    let services = AppServices::from_storage(
        &storage,
        config,
        Clock::fixed(fixed_now()),
        Duration::from_millis(10),
    )
    .expect("app services");
    services.auth().initialize().await;

    let app = Arc::new(TestApp { services });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom }
}
