//! Error types for the render cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::EngineError;

// == Cache Error Enum ==
/// Unified error type for the render cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The template engine failed to compile a template; never cached
    #[error("Failed to compile template '{template}': {source}")]
    Compile {
        template: String,
        #[source]
        source: EngineError,
    },

    /// The template engine failed to render a template; never cached
    #[error("Failed to render template '{template}' (context {fingerprint}): {source}")]
    Render {
        template: String,
        fingerprint: String,
        #[source]
        source: EngineError,
    },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Returns the engine error behind a compile or render failure, if any.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            CacheError::Compile { source, .. } | CacheError::Render { source, .. } => Some(source),
            CacheError::InvalidRequest(_) => None,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            CacheError::Compile { .. } | CacheError::Render { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render template".to_string(),
                Some(self.to_string()),
            ),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        };

        let body = match details {
            Some(details) => json!({ "success": false, "error": error, "details": details }),
            None => json!({ "success": false, "error": error }),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the render cache.
pub type Result<T> = std::result::Result<T, CacheError>;
