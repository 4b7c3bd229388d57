//! Template Renderer - Render mustache-style templates using Handlebars
//!
//! Templates are compiled once when registered and rendered against any
//! serializable context. Rendering is non-strict: unknown placeholders
//! become empty strings. HTML escaping is disabled since output goes into
//! issue titles and markdown bodies, not HTML.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Result, SyncError};

/// Renders templates using Handlebars templating
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new TemplateRenderer with default settings
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Compile and register a named template for later use
    ///
    /// Syntax errors surface here rather than at render time.
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| SyncError::Template(format!("Failed to compile template '{}': {}", name, e)))
    }

    /// Render a previously registered template
    pub fn render_named<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| SyncError::Template(format!("Failed to render template '{}': {}", name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn render(template: &str, context: &Value) -> String {
        let mut renderer = TemplateRenderer::new();
        renderer.register_template("t", template).unwrap();
        renderer.render_named("t", context).unwrap()
    }

    #[test]
    fn test_render_simple() {
        let result = render("Hello, {{name}}!", &json!({"name": "World"}));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_render_nested_path() {
        let context = json!({"row": {"A": "Fix login", "AB": "high"}, "rowIndex": 4});
        let result = render("Row {{rowIndex}}: {{row.A}} [{{row.AB}}]", &context);
        assert_eq!(result, "Row 4: Fix login [high]");
    }

    #[test]
    fn test_render_missing_variable_empty_string() {
        let result = render("Hello, {{row.Q}}!", &json!({"row": {}}));
        assert_eq!(result, "Hello, !");
    }

    #[test]
    fn test_render_no_escape_html() {
        let result = render("{{title}}", &json!({"title": "Tom & Jerry <draft>"}));
        assert_eq!(result, "Tom & Jerry <draft>");
    }

    #[test]
    fn test_register_and_render_named() {
        let mut renderer = TemplateRenderer::new();
        renderer.register_template("title", "#{{n}}").unwrap();
        assert_eq!(renderer.render_named("title", &json!({"n": 3})).unwrap(), "#3");
    }

    #[test]
    fn test_register_template_syntax_error() {
        let mut renderer = TemplateRenderer::new();
        let err = renderer.register_template("title", "{{#if x}}open").unwrap_err();
        assert!(matches!(err, SyncError::Template(_)));
    }

    #[test]
    fn test_render_named_not_found() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.render_named("nonexistent", &json!({})).is_err());
    }

    #[test]
    fn test_render_preserves_whitespace() {
        let result = render("Line 1\n\nLine 3", &json!({}));
        assert_eq!(result, "Line 1\n\nLine 3");
    }
}
