//! Request DTOs for the render cache API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CacheError, Result};
use crate::service::CachePolicy;

// == Cache Action ==
/// Action accepted by `POST /cache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    Invalidate,
    WarmUp,
}

/// Request body for `POST /cache`
///
/// # Fields
/// - `action`: `"invalidate"` or `"warmup"`
/// - `templatePath`: For `invalidate`, the template to drop; omitted = all
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheActionRequest {
    pub action: String,
    #[serde(default)]
    pub template_path: Option<String>,
}

impl CacheActionRequest {
    /// Parses the requested action.
    pub fn action(&self) -> Result<CacheAction> {
        match self.action.as_str() {
            "invalidate" => Ok(CacheAction::Invalidate),
            "warmup" => Ok(CacheAction::WarmUp),
            _ => Err(CacheError::InvalidRequest(
                "Invalid action. Supported actions: invalidate, warmup".to_string(),
            )),
        }
    }

    /// The template to invalidate; blank paths count as absent.
    pub fn template_path(&self) -> Option<&str> {
        non_blank(self.template_path.as_deref())
    }
}

/// Query string for `GET /cache`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheQuery {
    /// `stats`, `health`, or absent for both
    pub action: Option<String>,
}

/// Query string for `DELETE /cache`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateQuery {
    pub template: Option<String>,
}

impl InvalidateQuery {
    pub fn template(&self) -> Option<&str> {
        non_blank(self.template.as_deref())
    }
}

/// Request body for `POST /render`
///
/// # Fields
/// - `templatePath`: Template to render
/// - `context`: Rendering context (default `{}`)
/// - `policy`: `detail`, `list`, `static` or `default`
/// - `ttl`: Explicit output TTL in seconds; overrides `policy`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub template_path: String,
    #[serde(default = "empty_object")]
    pub context: Value,
    #[serde(default)]
    pub policy: CachePolicy,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl RenderRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.template_path.trim().is_empty() {
            return Some("templatePath cannot be empty".to_string());
        }
        None
    }

    /// The effective cache policy, with `ttl` taking precedence.
    pub fn effective_policy(&self) -> CachePolicy {
        match self.ttl {
            Some(secs) => CachePolicy::Custom(Duration::from_secs(secs)),
            None => self.policy,
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
