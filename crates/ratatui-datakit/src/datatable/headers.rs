use std::fmt;
use std::sync::Arc;

use ratatui::text::Line;
use ratatui_datakit_core::error::RenderError;
use ratatui_datakit_core::path;
use serde_json::Value;

/// Caller-supplied renderer producing a styled line for one cell.
pub type CellRenderer =
    Arc<dyn Fn(&Value) -> Result<Line<'static>, RenderError> + Send + Sync>;

/// How a column presents a row: a value path, or a custom renderer.
#[derive(Clone)]
pub enum CellContent {
    Path(String),
    Exec(CellRenderer),
}

impl fmt::Debug for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Exec(_) => f.debug_tuple("Exec").field(&"<fn>").finish(),
        }
    }
}

/// One column of the table.
///
/// `visible` is the user-toggleable flag. `can_see` gates the column out
/// entirely (never shown, never offered in the menu). `always_visible` pins
/// the column: shown regardless of `visible`, listed in the menu but locked.
#[derive(Clone, Debug)]
pub struct HeaderSpec {
    pub key: String,
    pub content: CellContent,
    pub visible: bool,
    pub can_see: bool,
    pub always_visible: bool,
}

impl HeaderSpec {
    /// Column reading the dotted `path`; `key` doubles as the heading.
    pub fn path(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: CellContent::Path(path.into()),
            visible: true,
            can_see: true,
            always_visible: false,
        }
    }

    /// Column rendered by a caller function.
    pub fn exec<F>(key: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Value) -> Result<Line<'static>, RenderError> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            content: CellContent::Exec(Arc::new(render)),
            visible: true,
            can_see: true,
            always_visible: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn restricted(mut self) -> Self {
        self.can_see = false;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.always_visible = true;
        self
    }

    /// Cell content for one row. A blank path value degrades to `empty_cell`;
    /// a renderer failure is the caller's recoverable error.
    pub fn render_cell(
        &self,
        row: &Value,
        empty_cell: &str,
    ) -> Result<Line<'static>, RenderError> {
        match &self.content {
            CellContent::Path(p) => {
                let text = path::path_text(row, p);
                if text.is_empty() {
                    Ok(Line::from(empty_cell.to_string()))
                } else {
                    Ok(Line::from(text))
                }
            }
            CellContent::Exec(render) => render(row),
        }
    }
}

/// The table's columns, in display order.
#[derive(Clone, Debug, Default)]
pub struct HeaderSet {
    headers: Vec<HeaderSpec>,
}

impl HeaderSet {
    pub fn new(headers: Vec<HeaderSpec>) -> Self {
        Self { headers }
    }

    pub fn all(&self) -> &[HeaderSpec] {
        &self.headers
    }

    /// Columns currently rendered.
    pub fn shown(&self) -> impl Iterator<Item = &HeaderSpec> {
        self.headers
            .iter()
            .filter(|h| h.can_see && (h.visible || h.always_visible))
    }

    pub fn shown_count(&self) -> usize {
        self.shown().count()
    }

    /// Columns offered in the visibility menu. Pinned entries are listed but
    /// locked; restricted ones never appear.
    pub fn toggleable(&self) -> impl Iterator<Item = &HeaderSpec> {
        self.headers.iter().filter(|h| h.can_see)
    }

    pub fn toggleable_count(&self) -> usize {
        self.toggleable().count()
    }

    /// Flips a column's visibility. Returns false when the key is unknown,
    /// restricted, or pinned.
    pub fn toggle(&mut self, key: &str) -> bool {
        let Some(header) = self.headers.iter_mut().find(|h| h.key == key) else {
            return false;
        };
        if !header.can_see || header.always_visible {
            return false;
        }
        header.visible = !header.visible;
        true
    }
}
