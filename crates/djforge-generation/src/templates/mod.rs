//! Template rendering adapter
//!
//! Template substitution itself is an external capability behind the
//! [`TemplateRenderer`] trait; the default implementation is backed by
//! handlebars. This module selects which template set applies per app type
//! and per service, and validates that every produced path stays inside the
//! project root.

mod context;
mod library;

pub use context::{app_context, project_context, service_context};
pub use library::{app_files, core_files, project_files, service_files, ServiceFileBase, TemplateFile};

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::GenerationError;

/// External rendering capability: same template source and context always
/// produce byte-identical output.
pub trait TemplateRenderer {
    /// Renders one template source against a context.
    fn render(&self, template_source: &str, context: &Value) -> Result<String, GenerationError>;
}

/// Handlebars-backed renderer
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Creates a renderer with HTML escaping disabled; output is source
    /// code, not markup.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template_source: &str, context: &Value) -> Result<String, GenerationError> {
        Ok(self.registry.render_template(template_source, context)?)
    }
}

/// Renders a template set against one context, producing (relative path,
/// bytes) pairs rooted at `base`. Every output path is validated: absolute
/// paths and parent-directory traversal are fatal.
pub fn render_files(
    renderer: &dyn TemplateRenderer,
    set_name: &str,
    base: &str,
    files: &[&TemplateFile],
    context: &Value,
) -> Result<Vec<(String, Vec<u8>)>, GenerationError> {
    let mut rendered = Vec::with_capacity(files.len());
    for file in files {
        let path = if base.is_empty() {
            file.rel_path.to_string()
        } else {
            format!("{base}/{}", file.rel_path)
        };
        validate_output_path(&path, set_name)?;
        let content = renderer.render(file.source, context)?;
        rendered.push((path, content.into_bytes()));
    }
    Ok(rendered)
}

/// Rejects paths that would escape the project root.
pub fn validate_output_path(path: &str, set_name: &str) -> Result<(), GenerationError> {
    let unsafe_path = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|segment| segment == ".." || segment.is_empty());
    if unsafe_path {
        return Err(GenerationError::UnsafeTemplatePath {
            path: path.to_string(),
            template_set: set_name.to_string(),
        });
    }
    Ok(())
}
