//! Raw payload shapes as the backend sends them.
//!
//! Every field is optional: the backend omits, renames and retypes fields
//! between releases, and the adapters in `mapping` decide the defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UserWire {
    #[serde(rename = "_id", deserialize_with = "loose_string")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AuthResponseWire {
    pub success: bool,
    pub message: Option<String>,
    pub token: Option<String>,
    pub user: Option<UserWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VerifyWire {
    pub valid: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProjectWire {
    #[serde(rename = "_id", deserialize_with = "loose_string")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub template_image_path: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "loose_f64")]
    pub analyses_count: Option<f64>,
    #[serde(deserialize_with = "loose_f64")]
    pub latest_progress: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnalysisWire {
    #[serde(rename = "_id", deserialize_with = "loose_string")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub project_id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub created_at: Option<String>,
    pub content: Option<AnalysisContentWire>,
    pub current_images_paths: Option<Vec<String>>,
    pub pdf_generated: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnalysisContentWire {
    #[serde(deserialize_with = "loose_f64")]
    pub progress_percentage: Option<f64>,
    pub observations: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
    pub issues_identified: Option<Vec<String>>,
    pub next_steps: Option<Vec<String>>,
    pub summary: Option<String>,
    pub risk_assessment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PdfStatusEnvelope {
    pub pdf_status: Option<PdfStatusWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PdfStatusWire {
    pub pdf_generated: Option<bool>,
    pub download_available: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateProjectRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub template_image: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest {
    pub current_images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FinishRequest {
    pub status: &'static str,
}

/// Returns `value[field]` when the backend wrapped the payload, otherwise the value itself.
pub(crate) fn unwrap_envelope(value: Value, field: &str) -> Value {
    match value {
        Value::Object(mut map) => match map.remove(field) {
            Some(inner) if !inner.is_null() => inner,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}

/// Like `unwrap_envelope`, but the result must be a list. `null` reads as empty.
pub(crate) fn unwrap_list(value: Value, field: &str) -> Result<Vec<Value>, ApiError> {
    match unwrap_envelope(value, field) {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::Malformed(format!(
            "expected a list of {field}, got {}",
            kind_of(&other)
        ))),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Malformed(format!("{what}: {err}")))
}

/// Accepts strings, numbers, and `{"$oid": "..."}` objects as text.
pub(crate) fn loose_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
    .filter(|s| !s.trim().is_empty())
}

fn loose_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(loose_id))
}

fn loose_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
