use std::fmt;
use std::sync::Arc;

use ratatui::text::Line;
use ratatui_datakit_core::error::RenderError;
use ratatui_datakit_core::path;
use serde_json::Value;

/// Caller-supplied renderer producing a styled line for one row.
pub type OptionRenderer =
    Arc<dyn Fn(&Value) -> Result<Line<'static>, RenderError> + Send + Sync>;

/// How an option presents a row: a label path, or a custom renderer.
///
/// Resolved once at configuration time; the two are mutually exclusive by
/// construction.
#[derive(Clone)]
pub enum OptionContent {
    /// Dotted path whose text is the display label.
    Path(String),
    /// Fallible custom renderer; failures degrade to fallback content per row.
    Render(OptionRenderer),
}

impl fmt::Debug for OptionContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Render(_) => f.debug_tuple("Render").field(&"<fn>").finish(),
        }
    }
}

/// Maps a row to a selectable key and its display content.
#[derive(Clone, Debug)]
pub struct OptionSpec {
    /// Dotted path extracting the unique key of a row.
    pub value: String,
    pub content: OptionContent,
}

impl Default for OptionSpec {
    fn default() -> Self {
        Self::labeled("value", "label")
    }
}

impl OptionSpec {
    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            content: OptionContent::Path(label.into()),
        }
    }

    pub fn rendered<F>(value: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Value) -> Result<Line<'static>, RenderError> + Send + Sync + 'static,
    {
        Self {
            value: value.into(),
            content: OptionContent::Render(Arc::new(render)),
        }
    }

    /// Extracts the row's key.
    pub fn key_of<'a>(&self, row: &'a Value) -> Option<&'a Value> {
        path::get_path(row, &self.value)
    }

    /// Label text for search matching; `None` when the content is a custom renderer.
    pub fn label_text(&self, row: &Value) -> Option<String> {
        match &self.content {
            OptionContent::Path(label) => Some(path::path_text(row, label)),
            OptionContent::Render(_) => None,
        }
    }

    /// Display content for one row; `Err` is the per-option recoverable failure.
    pub fn render_row(&self, row: &Value) -> Result<Line<'static>, RenderError> {
        match &self.content {
            OptionContent::Path(label) => Ok(Line::from(path::path_text(row, label))),
            OptionContent::Render(render) => render(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labeled_spec_reads_paths() {
        let spec = OptionSpec::labeled("id", "name.first");
        let row = json!({ "id": 7, "name": { "first": "Ada" } });
        assert_eq!(spec.key_of(&row), Some(&json!(7)));
        assert_eq!(spec.label_text(&row).as_deref(), Some("Ada"));
        assert_eq!(spec.render_row(&row).unwrap(), Line::from("Ada"));
    }

    #[test]
    fn rendered_spec_surfaces_failures() {
        let spec = OptionSpec::rendered("id", |_| Err(RenderError::new("boom")));
        let row = json!({ "id": 1 });
        assert!(spec.label_text(&row).is_none());
        assert_eq!(spec.render_row(&row), Err(RenderError::new("boom")));
    }
}
