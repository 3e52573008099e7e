//! HTTP access to the construction-progress backend.
//!
//! `ApiClient` attaches the stored bearer token to every request and clears
//! stored credentials whenever the backend answers 401. The typed endpoint
//! methods return domain records produced by the adapters in `mapping`.

mod config;
mod encode;
mod mapping;
mod wire;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use site_core::model::{
    Analysis, AnalysisId, ImageUpload, NewProject, PdfStatus, Project, ProjectId, Registration,
    User,
};
use storage::repository::CredentialRepository;

pub use config::{API_TIMEOUT_ENV, API_URL_ENV, ApiConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

use crate::error::ApiError;
use mapping::{
    ProjectDefaults, analysis_from_wire, pdf_status_from_wire, project_from_wire, user_from_wire,
};
use wire::{
    AnalysisWire, AnalyzeRequest, AuthResponseWire, CreateProjectRequest, FinishRequest,
    LoginRequest, PdfStatusEnvelope, ProjectWire, RegisterRequest, UserWire, VerifyWire, decode,
    loose_id, unwrap_envelope, unwrap_list,
};

/// Outcome of a login or registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: Option<String>,
    pub token: Option<String>,
    pub user: Option<User>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    credentials: Arc<dyn CredentialRepository>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(
        config: ApiConfig,
        credentials: Arc<dyn CredentialRepository>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = self
            .send_json(
                Method::POST,
                "/api/auth/login",
                Some(&LoginRequest { username, password }),
            )
            .await?;
        auth_response(body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let request = RegisterRequest {
            username: registration.username(),
            email: registration.email(),
            password: registration.password(),
            role: registration.role(),
        };
        let body = self
            .send_json(Method::POST, "/api/auth/register", Some(&request))
            .await?;
        auth_response(body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or a
    /// profile without a user id.
    pub async fn profile(&self) -> Result<User, ApiError> {
        let body = self.get_json("/auth/profile").await?;
        let wire: UserWire = decode(unwrap_envelope(body, "user"), "profile")?;
        user_from_wire(wire)
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    pub async fn verify_token(&self) -> Result<bool, ApiError> {
        let body = self.get_json("/auth/verify").await?;
        let wire: VerifyWire = decode(body, "token verification")?;
        Ok(wire.valid)
    }

    /// Lists every project. `cache_bust` adds a `t=<millis>` query so proxies
    /// never serve a stale listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or
    /// malformed payloads.
    pub async fn list_projects(
        &self,
        cache_bust: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Project>, ApiError> {
        let path = match cache_bust {
            Some(millis) => format!("/api/projects?t={millis}"),
            None => "/api/projects".to_owned(),
        };
        let body = self.get_json(&path).await?;
        projects_from_body(body, &ProjectDefaults::LISTING, now)
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or
    /// malformed payloads.
    pub async fn list_completed_projects(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Project>, ApiError> {
        let body = self.get_json("/api/projects/completed").await?;
        projects_from_body(body, &ProjectDefaults::COMPLETED, now)
    }

    /// Uploads the project with its template image as base64 and returns the
    /// created record. Fields the backend leaves out are taken from the request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or a
    /// response that names no project id.
    pub async fn create_project(
        &self,
        project: &NewProject,
        now: DateTime<Utc>,
    ) -> Result<Project, ApiError> {
        let template_image = encode::encode_image(project.template_image()).await?;
        let request = CreateProjectRequest {
            name: project.name(),
            description: project.description().unwrap_or_default(),
            template_image,
        };
        let body = self
            .send_json(Method::POST, "/api/projects", Some(&request))
            .await?;
        let created_id = body.get("project_id").and_then(loose_id);
        let mut wire: ProjectWire = decode(unwrap_envelope(body, "project"), "project")?;
        if wire.mongo_id.is_none() && wire.id.is_none() {
            wire.id = created_id;
        }
        if wire.name.as_deref().is_none_or(|name| name.trim().is_empty()) {
            wire.name = Some(project.name().to_owned());
        }
        if wire.description.is_none() {
            wire.description = project.description().map(str::to_owned);
        }
        project_from_wire(wire, &ProjectDefaults::LISTING, now)
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    pub async fn finish_project(&self, project_id: &ProjectId) -> Result<Option<String>, ApiError> {
        let path = format!("/api/projects/{project_id}/finish");
        let body = self
            .send_json(Method::POST, &path, Some(&FinishRequest { status: "completed" }))
            .await?;
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or
    /// malformed payloads.
    pub async fn list_project_analyses(
        &self,
        project_id: &ProjectId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Analysis>, ApiError> {
        let body = self
            .get_json(&format!("/api/projects/{project_id}/analyses"))
            .await?;
        Ok(unwrap_list(body, "analyses")?
            .into_iter()
            .filter_map(|item| {
                decode::<AnalysisWire>(item, "analysis")
                    .and_then(|wire| analysis_from_wire(wire, Some(project_id), now))
                    .map_err(|err| {
                        warn!(project = %project_id, error = %err, "skipping malformed analysis");
                    })
                    .ok()
            })
            .collect())
    }

    /// Submits images for analysis. When the backend answers with only an
    /// `analysis_id`, the full record is fetched before returning.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or
    /// malformed payloads.
    pub async fn submit_analysis(
        &self,
        project_id: &ProjectId,
        images: &[ImageUpload],
        now: DateTime<Utc>,
    ) -> Result<Analysis, ApiError> {
        let current_images = encode::encode_images(images).await?;
        let path = format!("/api/projects/{project_id}/analyze");
        let body = self
            .send_json(Method::POST, &path, Some(&AnalyzeRequest { current_images }))
            .await?;

        let analysis_id = body.get("analysis_id").and_then(loose_id);
        let embedded = body.get("analysis").is_some_and(|inner| !inner.is_null());
        if let (Some(id), false) = (&analysis_id, embedded) {
            debug!(analysis_id = %id, "analysis created, fetching full record");
            return self
                .get_analysis(&AnalysisId::new(id.as_str()), Some(project_id), now)
                .await;
        }

        let mut wire: AnalysisWire = decode(unwrap_envelope(body, "analysis"), "analysis")?;
        if wire.id.is_none() && wire.mongo_id.is_none() {
            wire.id = analysis_id;
        }
        analysis_from_wire(wire, Some(project_id), now)
    }

    /// `project_id` stands in when the record does not name its project.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or
    /// malformed payloads.
    pub async fn get_analysis(
        &self,
        analysis_id: &AnalysisId,
        project_id: Option<&ProjectId>,
        now: DateTime<Utc>,
    ) -> Result<Analysis, ApiError> {
        let body = self
            .get_json(&format!("/api/analyses/{analysis_id}"))
            .await?;
        let wire: AnalysisWire = decode(unwrap_envelope(body, "analysis"), "analysis")?;
        analysis_from_wire(wire, project_id, now)
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    pub async fn pdf_status(&self, analysis_id: &AnalysisId) -> Result<PdfStatus, ApiError> {
        let body = self
            .get_json(&format!("/api/analyses/{analysis_id}/pdf-status"))
            .await?;
        let envelope: PdfStatusEnvelope = decode(body, "pdf status")?;
        Ok(pdf_status_from_wire(envelope))
    }

    /// Asks the backend to render the report. The response body is the PDF.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    pub async fn generate_pdf(&self, analysis_id: &AnalysisId) -> Result<Vec<u8>, ApiError> {
        let path = format!("/api/analyses/{analysis_id}/download");
        let response = self
            .send(Method::POST, &path, Some(&serde_json::json!({})))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    pub async fn download_pdf(&self, analysis_id: &AnalysisId) -> Result<Vec<u8>, ApiError> {
        let path = format!("/api/analyses/{analysis_id}/download-pdf");
        let response = self.send::<()>(Method::GET, &path, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        self.send_json::<()>(Method::GET, path, None).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let response = self.send(method, path, body).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|err| ApiError::Malformed(format!("{path}: {err}")))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let request = self.http.request(method.clone(), self.config.endpoint(path));
        let request = self.authorize(request).await?;
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "backend call");
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "backend rejected credentials, clearing stored session");
            if let Err(err) = self.credentials.clear().await {
                warn!(error = %err, "failed to clear stored credentials");
            }
        }
        let message = error_message(response).await;
        Err(ApiError::Status { status, message })
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(match self.credentials.load_token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

fn auth_response(body: Value) -> Result<AuthResponse, ApiError> {
    let wire: AuthResponseWire = decode(body, "auth response")?;
    let user = wire.user.map(user_from_wire).transpose()?;
    Ok(AuthResponse {
        success: wire.success,
        message: wire.message,
        token: wire.token.filter(|t| !t.is_empty()),
        user,
    })
}

/// Records that cannot be normalized are logged and left out of the listing.
fn projects_from_body(
    body: Value,
    defaults: &ProjectDefaults,
    now: DateTime<Utc>,
) -> Result<Vec<Project>, ApiError> {
    Ok(unwrap_list(body, "projects")?
        .into_iter()
        .filter_map(|item| {
            decode::<ProjectWire>(item, "project")
                .and_then(|wire| project_from_wire(wire, defaults, now))
                .map_err(|err| warn!(error = %err, "skipping malformed project"))
                .ok()
        })
        .collect())
}

async fn error_message(response: Response) -> Option<String> {
    let text = response.text().await.ok()?;
    let value: Value = serde_json::from_str(&text).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}
