//! Template Engine Module
//!
//! The seam between the render cache and whatever actually turns templates
//! into output. The cache only needs two operations: compile a template path
//! into a context-independent artifact, and render an artifact with a context.

mod file;

use serde_json::Value;
use thiserror::Error;

pub use file::{CompiledTemplate, FileTemplateEngine};

// == Engine Error ==
/// Errors raised by a template engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No template exists at the given path
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Reading the template source failed
    #[error("I/O error reading template '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The template source is malformed
    #[error("Syntax error in template '{template}': {message}")]
    Syntax { template: String, message: String },

    /// Rendering failed for the given context
    #[error("Render error: {0}")]
    Render(String),

    /// The blocking task running the engine panicked or was cancelled
    #[error("Engine task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        EngineError::Task(e.to_string())
    }
}

// == Template Engine ==
/// A template compiler and renderer.
///
/// Both operations may be slow and may fail; the cache never stores a failure.
/// Implementations may block: the service calls them on tokio's blocking pool.
pub trait TemplateEngine: Send + Sync + 'static {
    /// The compiled, rendering-ready form of a template.
    type Artifact: Send + Sync + 'static;

    /// Compiles the template identified by `template_path`.
    fn compile(&self, template_path: &str) -> Result<Self::Artifact, EngineError>;

    /// Renders a compiled template with `context`.
    fn render(&self, artifact: &Self::Artifact, context: &Value) -> Result<String, EngineError>;
}
