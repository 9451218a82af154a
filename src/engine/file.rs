//! File Template Engine
//!
//! A small placeholder-substitution engine over a directory of template files.
//! `{{ post.title }}` is replaced by the value at that dotted path in the
//! context; array elements are addressed by index (`{{ posts.0.slug }}`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::{EngineError, TemplateEngine};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const DEFAULT_EXTENSION: &str = "html";

// == Compiled Template ==
/// A parsed template: literal text interleaved with variable lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    /// Template path the artifact was compiled from
    pub path: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Variable(Vec<String>),
}

impl CompiledTemplate {
    // == Parse ==
    /// Parses template source into segments.
    pub fn parse(path: &str, source: &str) -> Result<Self, EngineError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open.find(CLOSE).ok_or_else(|| EngineError::Syntax {
                template: path.to_string(),
                message: "unterminated '{{' tag".to_string(),
            })?;

            let expr = after_open[..end].trim();
            if expr.is_empty() {
                return Err(EngineError::Syntax {
                    template: path.to_string(),
                    message: "empty '{{ }}' tag".to_string(),
                });
            }
            segments.push(Segment::Variable(
                expr.split('.').map(|part| part.trim().to_string()).collect(),
            ));
            rest = &after_open[end + CLOSE.len()..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self {
            path: path.to_string(),
            segments,
        })
    }

    // == Render ==
    /// Substitutes every variable from `context`. Missing values render empty.
    pub fn render(&self, context: &Value) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Variable(path) => match lookup(context, path) {
                    None | Some(Value::Null) => {}
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                },
            }
        }
        out
    }
}

fn lookup<'a>(context: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(context, |current, part| match current {
        Value::Object(map) => map.get(part),
        Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

// == File Template Engine ==
/// Loads templates from files under a root directory.
#[derive(Debug, Clone)]
pub struct FileTemplateEngine {
    root: PathBuf,
}

impl FileTemplateEngine {
    /// Creates an engine reading templates under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a template path to a file inside the root.
    ///
    /// Absolute paths and `..` components are rejected. A path without a
    /// file extension falls back to `<path>.html` when the bare file is absent.
    fn resolve(&self, template_path: &str) -> Result<PathBuf, EngineError> {
        let relative = Path::new(template_path);
        let escapes_root = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if template_path.is_empty() || escapes_root {
            return Err(EngineError::TemplateNotFound(template_path.to_string()));
        }

        let direct = self.root.join(relative);
        if direct.is_file() || relative.extension().is_some() {
            return Ok(direct);
        }
        Ok(direct.with_extension(DEFAULT_EXTENSION))
    }
}

impl TemplateEngine for FileTemplateEngine {
    type Artifact = CompiledTemplate;

    fn compile(&self, template_path: &str) -> Result<CompiledTemplate, EngineError> {
        let file = self.resolve(template_path)?;
        let source = fs::read_to_string(&file).map_err(|e| match e.kind() {
            ErrorKind::NotFound => EngineError::TemplateNotFound(template_path.to_string()),
            _ => EngineError::Io {
                path: template_path.to_string(),
                source: e,
            },
        })?;

        debug!(template = template_path, file = %file.display(), "Compiling template");
        CompiledTemplate::parse(template_path, &source)
    }

    fn render(&self, artifact: &CompiledTemplate, context: &Value) -> Result<String, EngineError> {
        Ok(artifact.render(context))
    }
}
