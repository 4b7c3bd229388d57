//! Content rendering - turn a row into an issue title and body.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::sheets::index_to_column_letter;
use crate::template::TemplateRenderer;

const TITLE_TEMPLATE: &str = "title";
const BODY_TEMPLATE: &str = "body";

/// Cells of one row keyed by absolute column letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RowView(BTreeMap<String, String>);

impl RowView {
    /// Key each present cell by its column letter, starting at `start_col_index`.
    pub fn from_cells<S: AsRef<str>>(cells: &[S], start_col_index: usize) -> Self {
        Self(
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| (index_to_column_letter(start_col_index + i), cell.as_ref().to_string()))
                .collect(),
        )
    }
}

/// Values available to title and body templates.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'a> {
    pub row: &'a RowView,
    #[serde(rename = "rowIndex")]
    pub row_index: u32,
    pub now: &'a str,
}

/// Rendered issue content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedIssue {
    pub title: String,
    pub body: String,
}

/// Renders the configured title and body templates for a row.
pub struct ContentRenderer {
    renderer: TemplateRenderer,
}

impl ContentRenderer {
    /// Compile both templates; syntax errors are reported here.
    pub fn new(title_template: &str, body_template: &str) -> Result<Self> {
        let mut renderer = TemplateRenderer::new();
        renderer.register_template(TITLE_TEMPLATE, title_template)?;
        renderer.register_template(BODY_TEMPLATE, body_template)?;
        Ok(Self { renderer })
    }

    /// Render a row. `Ok(None)` means the title is blank and the row should be skipped.
    pub fn render(&self, row: &RowView, row_number: u32, now: &str) -> Result<Option<RenderedIssue>> {
        let context = RenderContext {
            row,
            row_index: row_number,
            now,
        };

        let title = self.renderer.render_named(TITLE_TEMPLATE, &context)?;
        if title.trim().is_empty() {
            return Ok(None);
        }
        let body = self.renderer.render_named(BODY_TEMPLATE, &context)?;

        Ok(Some(RenderedIssue { title, body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2024-05-01T09:30:00.000Z";

    #[test]
    fn test_row_view_letters() {
        let view = RowView::from_cells(&["x", "y", ""], 25);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json, serde_json::json!({"Z": "x", "AA": "y", "AB": ""}));
    }

    #[test]
    fn test_render_context_serialization() {
        let view = RowView::from_cells(&["Fix login"], 0);
        let context = RenderContext {
            row: &view,
            row_index: 7,
            now: NOW,
        };
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["row"]["A"], "Fix login");
        assert_eq!(json["rowIndex"], 7);
        assert_eq!(json["now"], NOW);
    }

    #[test]
    fn test_render_title_and_body() {
        let renderer = ContentRenderer::new("Row {{rowIndex}}: {{row.A}}", "{{row.B}}\n\nSynced at {{now}}").unwrap();
        let view = RowView::from_cells(&["Fix login", "Users cannot log in"], 0);

        let rendered = renderer.render(&view, 3, NOW).unwrap().unwrap();
        assert_eq!(rendered.title, "Row 3: Fix login");
        assert_eq!(rendered.body, format!("Users cannot log in\n\nSynced at {}", NOW));
    }

    #[test]
    fn test_blank_title_is_skip() {
        let renderer = ContentRenderer::new("  {{row.A}} ", "body").unwrap();
        let view = RowView::from_cells(&["", "something"], 0);
        assert_eq!(renderer.render(&view, 2, NOW).unwrap(), None);

        let view = RowView::default();
        assert_eq!(renderer.render(&view, 2, NOW).unwrap(), None);
    }

    #[test]
    fn test_invalid_template_rejected_up_front() {
        assert!(ContentRenderer::new("{{#each row}}", "body").is_err());
        assert!(ContentRenderer::new("ok", "{{/if}}").is_err());
    }
}
