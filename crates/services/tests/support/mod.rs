//! A throwaway backend on 127.0.0.1 that speaks the dashboard API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use services::{ApiConfig, AppServices, Clock};
use site_core::model::{ImageUpload, User, UserId};
use site_core::time::fixed_now;
use storage::repository::Storage;

pub const VALID_TOKEN: &str = "tok-1";
pub const PDF_BYTES: &[u8] = b"%PDF-1.4 mock report";

pub struct MockState {
    pub token_valid: bool,
    pub projects: Value,
    pub completed: Option<Value>,
    pub finish_status: StatusCode,
    pub project_analyses: Value,
    pub analyze_response: Value,
    pub create_response: Value,
    pub analyses: HashMap<String, Value>,
    pub pdf_generated: bool,
    pub pdf_status_fails: bool,
    pub generate_makes_ready: bool,

    pub verify_calls: usize,
    pub profile_calls: usize,
    pub finish_calls: usize,
    pub generate_calls: usize,
    pub auth_headers: Vec<Option<String>>,
    pub project_queries: Vec<HashMap<String, String>>,
    pub created: Vec<Value>,
    pub analyze_bodies: Vec<Value>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            token_valid: true,
            projects: json!({ "projects": [] }),
            completed: None,
            finish_status: StatusCode::OK,
            project_analyses: json!({ "analyses": [] }),
            analyze_response: json!({}),
            create_response: json!({ "success": true, "project": { "_id": "p-new" } }),
            analyses: HashMap::new(),
            pdf_generated: false,
            pdf_status_fails: false,
            generate_makes_ready: true,
            verify_calls: 0,
            profile_calls: 0,
            finish_calls: 0,
            generate_calls: 0,
            auth_headers: Vec::new(),
            project_queries: Vec::new(),
            created: Vec::new(),
            analyze_bodies: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn spawn(state: MockState) -> Self {
        let shared: Shared = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/auth/profile", get(profile))
            .route("/auth/verify", get(verify))
            .route("/api/projects", get(list_projects).post(create_project))
            .route("/api/projects/completed", get(completed_projects))
            .route("/api/projects/:id/finish", post(finish_project))
            .route("/api/projects/:id/analyses", get(project_analyses))
            .route("/api/projects/:id/analyze", post(analyze))
            .route("/api/analyses/:id", get(get_analysis))
            .route("/api/analyses/:id/pdf-status", get(pdf_status))
            .route("/api/analyses/:id/download", post(generate_pdf))
            .route("/api/analyses/:id/download-pdf", get(download_pdf))
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            state: shared,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state")
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url, Duration::from_secs(5)).expect("api config")
    }

    pub fn services(&self, storage: &Storage) -> AppServices {
        AppServices::from_storage(
            storage,
            self.config(),
            Clock::fixed(fixed_now()),
            Duration::from_millis(10),
        )
        .expect("app services")
    }
}

pub fn ana() -> User {
    User {
        id: UserId::new("u1"),
        username: "ana".into(),
        email: "ana@obra.example".into(),
        role: "engineer".into(),
    }
}

pub fn png(name: &str) -> ImageUpload {
    let bytes = vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];
    ImageUpload::new(name, bytes).expect("png fixture")
}

pub fn project_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "name": format!("Obra {id}"),
        "description": "Linha 2",
        "template_image_path": format!("/uploads/{id}.png"),
        "created_at": "2025-10-14T19:43:57Z",
        "analyses_count": 2,
        "latest_progress": 40,
        "status": status
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn authorized(headers: &HeaderMap) -> bool {
    bearer(headers).as_deref() == Some("Bearer tok-1")
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "ana" && body["password"] == "segredo" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "token": VALID_TOKEN,
                "user": { "_id": "u1", "username": "ana", "email": "ana@obra.example", "role": "engineer" }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Credenciais inválidas" })),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Username already exists" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": "tok-2",
            "user": {
                "id": "u2",
                "username": body["username"],
                "email": body["email"],
                "role": body.get("role").cloned().unwrap_or(json!("viewer"))
            }
        })),
    )
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.lock().expect("state").profile_calls += 1;
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "unauthorized" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "user": { "_id": "u1", "username": "ana", "email": "ana@obra.example", "role": "engineer" } })),
    )
}

async fn verify(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
    let mut state = state.lock().expect("state");
    state.verify_calls += 1;
    Json(json!({ "valid": state.token_valid && authorized(&headers) }))
}

async fn list_projects(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("state");
    state.auth_headers.push(bearer(&headers));
    state.project_queries.push(query);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token expirado" })));
    }
    (StatusCode::OK, Json(state.projects.clone()))
}

async fn create_project(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("state");
    state.created.push(body);
    (StatusCode::CREATED, Json(state.create_response.clone()))
}

async fn completed_projects(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    match state.lock().expect("state").completed.clone() {
        Some(body) => (StatusCode::OK, Json(body)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "boom" })),
        ),
    }
}

async fn finish_project(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("state");
    state.finish_calls += 1;
    assert_eq!(body, json!({ "status": "completed" }));
    let status = state.finish_status;
    let body = if status.is_success() {
        json!({ "success": true, "message": "Projeto finalizado" })
    } else {
        json!({ "message": "not here" })
    };
    (status, Json(body))
}

async fn project_analyses(State(state): State<Shared>, Path(_id): Path<String>) -> Json<Value> {
    Json(state.lock().expect("state").project_analyses.clone())
}

async fn analyze(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut state = state.lock().expect("state");
    state.analyze_bodies.push(body);
    Json(state.analyze_response.clone())
}

async fn get_analysis(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.lock().expect("state").analyses.get(&id) {
        Some(body) => (StatusCode::OK, Json(body.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Análise não encontrada" }))),
    }
}

async fn pdf_status(
    State(state): State<Shared>,
    Path(_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let state = state.lock().expect("state");
    if state.pdf_status_fails {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "pdf_status": {
                "pdf_generated": state.pdf_generated,
                "download_available": state.pdf_generated
            }
        })),
    )
}

async fn generate_pdf(State(state): State<Shared>, Path(_id): Path<String>) -> Vec<u8> {
    let mut state = state.lock().expect("state");
    state.generate_calls += 1;
    if state.generate_makes_ready {
        state.pdf_generated = true;
    }
    PDF_BYTES.to_vec()
}

async fn download_pdf(
    State(state): State<Shared>,
    Path(_id): Path<String>,
) -> (StatusCode, Vec<u8>) {
    if state.lock().expect("state").pdf_generated {
        (StatusCode::OK, PDF_BYTES.to_vec())
    } else {
        (StatusCode::NOT_FOUND, Vec::new())
    }
}
