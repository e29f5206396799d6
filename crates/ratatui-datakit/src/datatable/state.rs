use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_datakit_core::debounce::Debounce;
use ratatui_datakit_core::input::InputEvent;
use ratatui_datakit_core::input::KeyCode;
use ratatui_datakit_core::input::KeyEvent;
use ratatui_datakit_core::path;
use ratatui_datakit_core::theme::Theme;
use ratatui_datakit_core::viewport::ListViewport;
use regex::RegexBuilder;
use serde_json::Value;

use crate::datatable::headers::CellContent;
use crate::datatable::headers::HeaderSet;
use crate::datatable::headers::HeaderSpec;
use crate::pagination::PaginationState;

pub type RowGate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type TableSearch = Arc<dyn Fn(&Value, &str) -> bool + Send + Sync>;
pub type ExtraRenderer = Arc<dyn Fn(&[Value], Rect, &mut Buffer, &Theme) + Send + Sync>;

/// Whether the table slices locally held data or asks the caller for pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationMode {
    Static,
    Dynamic,
}

/// The render target. Paging, search, and selection survive a switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayAs {
    Table,
    Card,
    Extra(String),
}

/// Which part of the table owns the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFocus {
    Body,
    Search,
    HeaderMenu { cursor: usize },
}

/// Tri-state gate for per-row actions.
#[derive(Clone, Default)]
pub enum ActionGate {
    #[default]
    Deny,
    Allow,
    When(RowGate),
}

impl ActionGate {
    pub fn allows(&self, row: &Value) -> bool {
        match self {
            Self::Deny => false,
            Self::Allow => true,
            Self::When(gate) => gate(row),
        }
    }
}

impl fmt::Debug for ActionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deny => f.write_str("Deny"),
            Self::Allow => f.write_str("Allow"),
            Self::When(_) => f.write_str("When(<fn>)"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkActionSpec {
    pub title: String,
}

impl BulkActionSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// An alternate full-body view offered in the display cycle.
#[derive(Clone)]
pub struct ExtraViewSpec {
    pub key: String,
    pub can_view: bool,
    pub render: ExtraRenderer,
}

impl ExtraViewSpec {
    pub fn new<F>(key: impl Into<String>, render: F) -> Self
    where
        F: Fn(&[Value], Rect, &mut Buffer, &Theme) + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            can_view: true,
            render: Arc::new(render),
        }
    }

    pub fn restricted(mut self) -> Self {
        self.can_view = false;
        self
    }
}

impl fmt::Debug for ExtraViewSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtraViewSpec")
            .field("key", &self.key)
            .field("can_view", &self.can_view)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct DataTableOptions {
    /// Row selection enabled.
    pub toggle_rows: bool,
    pub no_head: bool,
    /// `r` re-emits the current query as a refetch.
    pub use_get_as_refresh: bool,
    pub empty_table: String,
    pub empty_cell: String,
    /// Dotted path extracting the stored value of a selected row; the whole
    /// row is stored when unset.
    pub key_extractor: Option<String>,
    pub edit_title: String,
    pub delete_title: String,
    /// Dynamic search fires debounced while typing instead of on submit only.
    pub search_on_type: bool,
    pub search_timeout: Duration,
}

impl Default for DataTableOptions {
    fn default() -> Self {
        Self {
            toggle_rows: true,
            no_head: false,
            use_get_as_refresh: true,
            empty_table: "No Data in the table".to_string(),
            empty_cell: "--".to_string(),
            key_extractor: None,
            edit_title: "Edit".to_string(),
            delete_title: "Delete".to_string(),
            search_on_type: false,
            search_timeout: Duration::from_millis(500),
        }
    }
}

/// A page request for the caller to execute against its data source.
///
/// Only emitted in dynamic mode. Feed the outcome back with
/// [`DataTableState::apply_data`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TableAction {
    None,
    Redraw,
    /// Enter on the cursor row. Carries the index into `data`.
    Activated(usize),
    Edit(usize),
    Delete(usize),
    /// A bulk action invoked over the current selection.
    Bulk { index: usize, rows: Vec<Value> },
    SelectionChanged,
    DisplayChanged,
}

/// Composes columns, paging, search, selection, and display modes over a set
/// of `serde_json::Value` rows.
///
/// Static mode holds all rows and slices/filters locally. Dynamic mode renders
/// whatever `data` it was last given; page, limit, and search changes emit a
/// [`TableQuery`] through [`poll`](Self::poll) and the caller answers with
/// [`apply_data`](Self::apply_data).
pub struct DataTableState {
    pub body: ListViewport,
    headers: HeaderSet,
    data: Vec<Value>,
    /// Indices surviving the static search filter; `None` when unfiltered.
    filtered: Option<Vec<usize>>,
    pagination: PaginationState,
    mode: PaginationMode,
    /// The applied search term.
    query: String,
    /// The term being composed while the search line has focus.
    search_input: String,
    on_search: Option<TableSearch>,
    selection: BTreeMap<usize, Value>,
    display: DisplayAs,
    cursor: usize,
    can_edit: ActionGate,
    can_delete: ActionGate,
    bulk_actions: Vec<BulkActionSpec>,
    extra_views: Vec<ExtraViewSpec>,
    loading: bool,
    debounce: Debounce,
    started: bool,
    focus: TableFocus,
    pending: Option<TableQuery>,
    options: DataTableOptions,
}

impl DataTableState {
    pub fn new(headers: Vec<HeaderSpec>) -> Self {
        Self::with_options(headers, PaginationMode::Static, DataTableOptions::default())
    }

    pub fn with_options(
        headers: Vec<HeaderSpec>,
        mode: PaginationMode,
        options: DataTableOptions,
    ) -> Self {
        Self {
            body: ListViewport::default(),
            headers: HeaderSet::new(headers),
            data: Vec::new(),
            filtered: None,
            pagination: PaginationState::default(),
            mode,
            query: String::new(),
            search_input: String::new(),
            on_search: None,
            selection: BTreeMap::new(),
            display: DisplayAs::Table,
            cursor: 0,
            can_edit: ActionGate::Deny,
            can_delete: ActionGate::Deny,
            bulk_actions: Vec::new(),
            extra_views: Vec::new(),
            loading: false,
            debounce: Debounce::new(options.search_timeout),
            started: false,
            focus: TableFocus::Body,
            pending: None,
            options,
        }
    }

    pub fn options(&self) -> &DataTableOptions {
        &self.options
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn display(&self) -> &DisplayAs {
        &self.display
    }

    pub fn focus(&self) -> TableFocus {
        self.focus
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.pagination.set_limit(limit);
        if self.mode == PaginationMode::Dynamic {
            self.queue_query();
        }
        self.reset_cursor();
    }

    pub fn set_can_edit(&mut self, gate: ActionGate) {
        self.can_edit = gate;
    }

    pub fn set_can_delete(&mut self, gate: ActionGate) {
        self.can_delete = gate;
    }

    pub fn can_edit(&self, row: &Value) -> bool {
        self.can_edit.allows(row)
    }

    pub fn can_delete(&self, row: &Value) -> bool {
        self.can_delete.allows(row)
    }

    /// True when editing is offered at all; `When` gates still decide per row.
    pub fn edit_offered(&self) -> bool {
        !matches!(self.can_edit, ActionGate::Deny)
    }

    pub fn delete_offered(&self) -> bool {
        !matches!(self.can_delete, ActionGate::Deny)
    }

    pub fn set_bulk_actions(&mut self, actions: Vec<BulkActionSpec>) {
        self.bulk_actions = actions;
    }

    pub fn bulk_actions(&self) -> &[BulkActionSpec] {
        &self.bulk_actions
    }

    pub fn add_extra_view(&mut self, view: ExtraViewSpec) {
        self.extra_views.push(view);
    }

    pub(crate) fn extra_view(&self, key: &str) -> Option<&ExtraViewSpec> {
        self.extra_views.iter().find(|v| v.key == key)
    }

    /// Replaces the default per-column regex match for static search.
    pub fn set_on_search<F>(&mut self, predicate: F)
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        self.on_search = Some(Arc::new(predicate));
        if self.mode == PaginationMode::Static {
            self.apply_static_filter();
        }
    }

    /// Installs the full data set (static mode). The current query re-filters.
    pub fn set_data(&mut self, data: Vec<Value>) {
        self.data = data;
        self.selection.clear();
        self.apply_static_filter();
    }

    /// Installs one page of rows plus the source's total count (dynamic mode).
    pub fn apply_data(&mut self, rows: Vec<Value>, total: usize) {
        self.data = rows;
        self.selection.clear();
        self.pagination.set_total(total);
        self.loading = false;
        self.reset_cursor();
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Indices into `data` rendered on the current page, in display order.
    pub fn visible_indices(&self) -> Vec<usize> {
        match self.mode {
            PaginationMode::Dynamic => (0..self.data.len()).collect(),
            PaginationMode::Static => {
                let base: Vec<usize> = match &self.filtered {
                    Some(f) => f.clone(),
                    None => (0..self.data.len()).collect(),
                };
                let (start, end) = self.pagination.slice_bounds(base.len());
                base[start..end].to_vec()
            }
        }
    }

    pub fn visible_rows(&self) -> Vec<&Value> {
        self.visible_indices()
            .into_iter()
            .map(|i| &self.data[i])
            .collect()
    }

    /// The `data` index under the cursor.
    pub fn cursor_index(&self) -> Option<usize> {
        self.visible_indices().get(self.cursor).copied()
    }

    pub fn cursor_row(&self) -> Option<&Value> {
        self.cursor_index().map(|i| &self.data[i])
    }

    pub fn set_display(&mut self, display: DisplayAs) -> bool {
        if let DisplayAs::Extra(key) = &display {
            let offered = self.extra_view(key).is_some_and(|v| v.can_view);
            if !offered {
                return false;
            }
        }
        self.display = display;
        true
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains_key(&index)
    }

    /// The stored values of all selected rows, in index order.
    pub fn selected_values(&self) -> Vec<Value> {
        self.selection.values().cloned().collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selects or deselects the row at `index` (into `data`).
    pub fn toggle_row(&mut self, index: usize) -> bool {
        if !self.options.toggle_rows {
            return false;
        }
        let Some(row) = self.data.get(index) else {
            return false;
        };
        if self.selection.remove(&index).is_none() {
            let value = match &self.options.key_extractor {
                Some(p) => path::get_path(row, p).cloned().unwrap_or_else(|| row.clone()),
                None => row.clone(),
            };
            self.selection.insert(index, value);
        }
        true
    }

    /// Clears a non-empty selection; a no-op otherwise.
    pub fn toggle_all(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// Invokes bulk action `index` over the current selection.
    pub fn invoke_bulk(&self, index: usize) -> TableAction {
        if self.selection.is_empty() || index >= self.bulk_actions.len() {
            return TableAction::None;
        }
        TableAction::Bulk {
            index,
            rows: self.selected_values(),
        }
    }

    /// Re-emits the current query (dynamic mode with refresh enabled).
    pub fn refresh(&mut self) -> bool {
        if self.mode != PaginationMode::Dynamic || !self.options.use_get_as_refresh {
            return false;
        }
        self.queue_query();
        true
    }

    /// Drives the query machinery; call once per event-loop turn.
    ///
    /// Emits the initial dynamic fetch, a debounced search-on-type query, or
    /// whatever page/limit/search change was queued since the last call.
    pub fn poll(&mut self, now: Instant) -> Option<TableQuery> {
        if !self.started {
            self.started = true;
            if self.mode == PaginationMode::Dynamic {
                self.queue_query();
            }
        }
        if self.debounce.fire(now) {
            self.submit_search();
        }
        self.pending.take()
    }

    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> TableAction {
        match event {
            InputEvent::Key(key) => match self.focus {
                TableFocus::Body => self.handle_body_key(key),
                TableFocus::Search => self.handle_search_key(key, now),
                TableFocus::HeaderMenu { cursor } => self.handle_menu_key(key, cursor),
            },
            InputEvent::Paste(text) => {
                if self.focus == TableFocus::Search {
                    self.search_input.push_str(&text);
                    self.search_edited(now);
                    TableAction::Redraw
                } else {
                    TableAction::None
                }
            }
        }
    }

    fn handle_body_key(&mut self, key: KeyEvent) -> TableAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Char('g') => self.cursor_to(0),
            KeyCode::Char('G') => self.cursor_to(self.visible_indices().len().saturating_sub(1)),
            KeyCode::Left => self.change_page(|p| p.prev()),
            KeyCode::Right => self.change_page(|p| p.next()),
            KeyCode::Home => self.change_page(|p| p.page() != 1 && p.set_page(1)),
            KeyCode::End => self.change_page(|p| {
                let last = p.total_pages().max(1);
                p.page() != last && p.set_page(last)
            }),
            KeyCode::Char(' ') => match self.cursor_index() {
                Some(i) if self.toggle_row(i) => TableAction::SelectionChanged,
                _ => TableAction::None,
            },
            KeyCode::Char('a') => {
                if self.toggle_all() {
                    TableAction::SelectionChanged
                } else {
                    TableAction::None
                }
            }
            KeyCode::Enter => match self.cursor_index() {
                Some(i) => TableAction::Activated(i),
                None => TableAction::None,
            },
            KeyCode::Char('e') => self.gated_action(TableAction::Edit, |s, row| s.can_edit(row)),
            KeyCode::Char('d') => {
                self.gated_action(TableAction::Delete, |s, row| s.can_delete(row))
            }
            KeyCode::Char('/') => {
                self.search_input = self.query.clone();
                self.focus = TableFocus::Search;
                TableAction::Redraw
            }
            KeyCode::Char('h') => {
                if self.headers.toggleable_count() == 0 {
                    return TableAction::None;
                }
                self.focus = TableFocus::HeaderMenu { cursor: 0 };
                TableAction::Redraw
            }
            KeyCode::Char('v') => {
                if self.cycle_display() {
                    TableAction::DisplayChanged
                } else {
                    TableAction::None
                }
            }
            KeyCode::Char('r') => {
                if self.refresh() {
                    TableAction::Redraw
                } else {
                    TableAction::None
                }
            }
            KeyCode::Char(c @ '1'..='9') if !self.selection.is_empty() => {
                let index = c as usize - '1' as usize;
                self.invoke_bulk(index)
            }
            KeyCode::Esc => {
                if self.toggle_all() {
                    TableAction::SelectionChanged
                } else {
                    TableAction::None
                }
            }
            _ => TableAction::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) -> TableAction {
        match key.code {
            KeyCode::Enter => {
                self.debounce.cancel();
                self.submit_search();
                self.focus = TableFocus::Body;
                TableAction::Redraw
            }
            KeyCode::Esc => {
                self.debounce.cancel();
                self.search_input = self.query.clone();
                self.focus = TableFocus::Body;
                TableAction::Redraw
            }
            KeyCode::Backspace => {
                if self.search_input.pop().is_none() {
                    return TableAction::None;
                }
                self.search_edited(now);
                TableAction::Redraw
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.search_edited(now);
                TableAction::Redraw
            }
            _ => TableAction::None,
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent, cursor: usize) -> TableAction {
        let count = self.headers.toggleable_count();
        match key.code {
            KeyCode::Esc | KeyCode::Char('h') => {
                self.focus = TableFocus::Body;
                TableAction::Redraw
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus = TableFocus::HeaderMenu {
                    cursor: cursor.saturating_sub(1),
                };
                TableAction::Redraw
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.focus = TableFocus::HeaderMenu {
                    cursor: (cursor + 1).min(count.saturating_sub(1)),
                };
                TableAction::Redraw
            }
            KeyCode::Char(' ') => {
                let key = self
                    .headers
                    .toggleable()
                    .nth(cursor)
                    .map(|h| h.key.clone());
                match key {
                    Some(k) if self.headers.toggle(&k) => TableAction::Redraw,
                    _ => TableAction::None,
                }
            }
            _ => TableAction::None,
        }
    }

    fn move_cursor(&mut self, dir: i32) -> TableAction {
        let len = self.visible_indices().len();
        if len == 0 {
            return TableAction::None;
        }
        let next = if dir > 0 {
            (self.cursor + 1).min(len - 1)
        } else {
            self.cursor.saturating_sub(1)
        };
        self.cursor_to(next)
    }

    fn cursor_to(&mut self, index: usize) -> TableAction {
        if index == self.cursor {
            return TableAction::None;
        }
        self.cursor = index;
        self.body.ensure_visible(index);
        TableAction::Redraw
    }

    fn change_page<F>(&mut self, step: F) -> TableAction
    where
        F: FnOnce(&mut PaginationState) -> bool,
    {
        if !step(&mut self.pagination) {
            return TableAction::None;
        }
        if self.mode == PaginationMode::Dynamic {
            self.queue_query();
        }
        self.reset_cursor();
        TableAction::Redraw
    }

    fn gated_action<F>(&mut self, make: fn(usize) -> TableAction, gate: F) -> TableAction
    where
        F: Fn(&Self, &Value) -> bool,
    {
        let Some(index) = self.cursor_index() else {
            return TableAction::None;
        };
        if gate(self, &self.data[index]) {
            make(index)
        } else {
            TableAction::None
        }
    }

    fn cycle_display(&mut self) -> bool {
        let mut order = vec![DisplayAs::Table, DisplayAs::Card];
        for view in self.extra_views.iter().filter(|v| v.can_view) {
            order.push(DisplayAs::Extra(view.key.clone()));
        }
        let at = order.iter().position(|d| *d == self.display).unwrap_or(0);
        let next = order[(at + 1) % order.len()].clone();
        if next == self.display {
            return false;
        }
        self.display = next;
        true
    }

    fn search_edited(&mut self, now: Instant) {
        match self.mode {
            // client-side filtering is cheap: apply on every edit
            PaginationMode::Static => {
                self.query = self.search_input.clone();
                self.apply_static_filter();
            }
            PaginationMode::Dynamic => {
                if self.options.search_on_type {
                    self.debounce.schedule(now);
                }
            }
        }
    }

    fn submit_search(&mut self) {
        self.query = self.search_input.clone();
        match self.mode {
            PaginationMode::Static => self.apply_static_filter(),
            PaginationMode::Dynamic => {
                self.pagination.set_page(1);
                self.queue_query();
                self.reset_cursor();
            }
        }
    }

    fn queue_query(&mut self) {
        let term = self.query.trim();
        self.pending = Some(TableQuery {
            page: self.pagination.page(),
            limit: self.pagination.limit(),
            search: if term.is_empty() {
                None
            } else {
                Some(term.to_string())
            },
        });
    }

    /// Recomputes `filtered` from the applied query (static mode).
    ///
    /// A caller predicate fully determines matches; otherwise every shown path
    /// column is tested with a case-insensitive regex (falling back to a
    /// substring match when the term is not a valid pattern).
    fn apply_static_filter(&mut self) {
        if self.mode != PaginationMode::Static {
            return;
        }
        let term = self.query.trim().to_string();
        if term.is_empty() {
            self.filtered = None;
            self.pagination.set_total(self.data.len());
        } else if let Some(matcher) = self.on_search.clone() {
            let indices: Vec<usize> = (0..self.data.len())
                .filter(|&i| matcher(&self.data[i], &term))
                .collect();
            self.pagination.set_total(indices.len());
            self.filtered = Some(indices);
        } else {
            let regex = RegexBuilder::new(&term).case_insensitive(true).build();
            let paths: Vec<String> = self
                .headers
                .shown()
                .filter_map(|h| match &h.content {
                    CellContent::Path(p) => Some(p.clone()),
                    CellContent::Exec(_) => None,
                })
                .collect();
            let lowered = term.to_lowercase();
            let indices: Vec<usize> = (0..self.data.len())
                .filter(|&i| {
                    paths.iter().any(|p| {
                        let text = path::path_text(&self.data[i], p);
                        match &regex {
                            Ok(re) => re.is_match(&text),
                            Err(_) => text.to_lowercase().contains(&lowered),
                        }
                    })
                })
                .collect();
            self.pagination.set_total(indices.len());
            self.filtered = Some(indices);
        }
        self.pagination.set_page(1);
        self.reset_cursor();
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.body.to_top();
        self.body.set_content(self.visible_indices().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                json!({
                    "id": i,
                    "name": format!("user {i}"),
                    "group": if i % 2 == 0 { "even" } else { "odd" },
                })
            })
            .collect()
    }

    fn headers() -> Vec<HeaderSpec> {
        vec![
            HeaderSpec::path("name", "name"),
            HeaderSpec::path("group", "group"),
        ]
    }

    fn table(n: usize) -> DataTableState {
        let mut t = DataTableState::new(headers());
        t.set_data(rows(n));
        t
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    #[test]
    fn static_slicing_by_page() {
        let mut t = table(25);
        assert_eq!(t.visible_indices(), (0..10).collect::<Vec<_>>());
        assert_eq!(t.pagination().total_pages(), 3);

        t.handle_event(key(KeyCode::End), Instant::now());
        assert_eq!(t.pagination().page(), 3);
        assert_eq!(t.visible_indices(), (20..25).collect::<Vec<_>>());

        t.handle_event(key(KeyCode::Home), Instant::now());
        assert_eq!(t.visible_indices(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn static_search_filters_and_resets_page() {
        let mut t = table(25);
        t.handle_event(key(KeyCode::End), Instant::now());
        assert_eq!(t.pagination().page(), 3);

        t.handle_event(key(KeyCode::Char('/')), Instant::now());
        for c in "odd".chars() {
            t.handle_event(key(KeyCode::Char(c)), Instant::now());
        }
        t.handle_event(key(KeyCode::Enter), Instant::now());

        assert_eq!(t.focus(), TableFocus::Body);
        assert_eq!(t.pagination().page(), 1);
        assert_eq!(t.pagination().total(), 12);
        assert!(t.visible_rows().iter().all(|r| r["group"] == json!("odd")));
    }

    #[test]
    fn blank_search_restores_all_rows() {
        let mut t = table(25);
        t.handle_event(key(KeyCode::Char('/')), Instant::now());
        t.handle_event(key(KeyCode::Char('z')), Instant::now());
        t.handle_event(key(KeyCode::Enter), Instant::now());
        assert_eq!(t.pagination().total(), 0);

        t.handle_event(key(KeyCode::Char('/')), Instant::now());
        t.handle_event(key(KeyCode::Backspace), Instant::now());
        t.handle_event(key(KeyCode::Enter), Instant::now());
        assert_eq!(t.pagination().total(), 25);
    }

    #[test]
    fn custom_search_predicate_wins() {
        let mut t = table(10);
        t.set_on_search(|row, term| row["id"].to_string() == term);
        t.handle_event(key(KeyCode::Char('/')), Instant::now());
        t.handle_event(key(KeyCode::Char('7')), Instant::now());
        t.handle_event(key(KeyCode::Enter), Instant::now());
        assert_eq!(t.visible_indices(), vec![7]);
    }

    #[test]
    fn selection_toggles_and_clears_only() {
        let mut t = table(5);
        assert_eq!(
            t.handle_event(key(KeyCode::Char(' ')), Instant::now()),
            TableAction::SelectionChanged
        );
        t.handle_event(key(KeyCode::Down), Instant::now());
        t.handle_event(key(KeyCode::Char(' ')), Instant::now());
        assert_eq!(t.selection_len(), 2);
        assert!(t.is_selected(0));
        assert!(t.is_selected(1));

        // toggle the same row off
        t.handle_event(key(KeyCode::Char(' ')), Instant::now());
        assert_eq!(t.selection_len(), 1);

        // toggle_all clears a non-empty selection and does nothing after
        assert_eq!(
            t.handle_event(key(KeyCode::Char('a')), Instant::now()),
            TableAction::SelectionChanged
        );
        assert_eq!(t.selection_len(), 0);
        assert_eq!(
            t.handle_event(key(KeyCode::Char('a')), Instant::now()),
            TableAction::None
        );
    }

    #[test]
    fn selection_stores_extracted_keys() {
        let mut t = DataTableState::with_options(
            headers(),
            PaginationMode::Static,
            DataTableOptions {
                key_extractor: Some("id".to_string()),
                ..Default::default()
            },
        );
        t.set_data(rows(3));
        t.toggle_row(2);
        assert_eq!(t.selected_values(), vec![json!(2)]);
    }

    #[test]
    fn selection_disabled_without_toggle_rows() {
        let mut t = DataTableState::with_options(
            headers(),
            PaginationMode::Static,
            DataTableOptions {
                toggle_rows: false,
                ..Default::default()
            },
        );
        t.set_data(rows(3));
        assert_eq!(
            t.handle_event(key(KeyCode::Char(' ')), Instant::now()),
            TableAction::None
        );
        assert_eq!(t.selection_len(), 0);
    }

    #[test]
    fn bulk_action_carries_the_selected_values() {
        let mut t = table(5);
        t.set_bulk_actions(vec![BulkActionSpec::new("Archive")]);
        t.toggle_row(1);
        t.toggle_row(3);
        let action = t.handle_event(key(KeyCode::Char('1')), Instant::now());
        let TableAction::Bulk { index, rows } = action else {
            panic!("expected a bulk action, got {action:?}");
        };
        assert_eq!(index, 0);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn action_gates_resolve_per_row() {
        let mut t = table(5);
        assert_eq!(
            t.handle_event(key(KeyCode::Char('e')), Instant::now()),
            TableAction::None
        );

        t.set_can_edit(ActionGate::Allow);
        assert_eq!(
            t.handle_event(key(KeyCode::Char('e')), Instant::now()),
            TableAction::Edit(0)
        );

        t.set_can_delete(ActionGate::When(Arc::new(|row| {
            row["group"] == json!("odd")
        })));
        assert_eq!(
            t.handle_event(key(KeyCode::Char('d')), Instant::now()),
            TableAction::None
        );
        t.handle_event(key(KeyCode::Down), Instant::now());
        assert_eq!(
            t.handle_event(key(KeyCode::Char('d')), Instant::now()),
            TableAction::Delete(1)
        );
    }

    #[test]
    fn dynamic_mode_emits_queries() {
        let mut t = DataTableState::with_options(
            headers(),
            PaginationMode::Dynamic,
            DataTableOptions::default(),
        );
        let now = Instant::now();

        let q = t.poll(now).expect("initial query");
        assert_eq!(q, TableQuery { page: 1, limit: 10, search: None });

        t.apply_data(rows(10), 45);
        assert_eq!(t.pagination().total_pages(), 5);
        // dynamic mode never slices what it holds
        assert_eq!(t.visible_indices().len(), 10);

        t.handle_event(key(KeyCode::Right), now);
        let q = t.poll(now).expect("page query");
        assert_eq!(q.page, 2);

        t.handle_event(key(KeyCode::Char('/')), now);
        t.handle_event(key(KeyCode::Char('x')), now);
        assert!(t.poll(now).is_none()); // submit not reached yet
        t.handle_event(key(KeyCode::Enter), now);
        let q = t.poll(now).expect("search query");
        assert_eq!(q, TableQuery { page: 1, limit: 10, search: Some("x".to_string()) });
    }

    #[test]
    fn dynamic_search_on_type_debounces() {
        let mut t = DataTableState::with_options(
            headers(),
            PaginationMode::Dynamic,
            DataTableOptions {
                search_on_type: true,
                ..Default::default()
            },
        );
        let t0 = Instant::now();
        t.poll(t0); // initial

        t.handle_event(key(KeyCode::Char('/')), t0);
        t.handle_event(key(KeyCode::Char('a')), t0);
        t.handle_event(key(KeyCode::Char('b')), t0 + Duration::from_millis(100));
        assert!(t.poll(t0 + Duration::from_millis(400)).is_none());

        let q = t.poll(t0 + Duration::from_millis(700)).expect("debounced");
        assert_eq!(q.search.as_deref(), Some("ab"));
        assert_eq!(q.page, 1);
    }

    #[test]
    fn refresh_requeues_the_current_query() {
        let mut t = DataTableState::with_options(
            headers(),
            PaginationMode::Dynamic,
            DataTableOptions::default(),
        );
        let now = Instant::now();
        t.poll(now);
        t.apply_data(rows(10), 45);
        t.handle_event(key(KeyCode::Right), now);
        t.poll(now);

        assert_eq!(
            t.handle_event(key(KeyCode::Char('r')), now),
            TableAction::Redraw
        );
        let q = t.poll(now).expect("refresh query");
        assert_eq!(q.page, 2);

        // static tables have nothing to refetch
        let mut t = table(5);
        assert_eq!(
            t.handle_event(key(KeyCode::Char('r')), now),
            TableAction::None
        );
    }

    #[test]
    fn header_menu_toggles_columns() {
        let mut t = table(5);
        t.handle_event(key(KeyCode::Char('h')), Instant::now());
        assert_eq!(t.focus(), TableFocus::HeaderMenu { cursor: 0 });

        t.handle_event(key(KeyCode::Down), Instant::now());
        t.handle_event(key(KeyCode::Char(' ')), Instant::now());
        let shown: Vec<&str> = t.headers().shown().map(|h| h.key.as_str()).collect();
        assert_eq!(shown, vec!["name"]);

        t.handle_event(key(KeyCode::Esc), Instant::now());
        assert_eq!(t.focus(), TableFocus::Body);
    }

    #[test]
    fn display_cycle_skips_restricted_views_and_keeps_state() {
        let mut t = table(25);
        t.add_extra_view(ExtraViewSpec::new("chart", |_, _, _, _| {}));
        t.add_extra_view(ExtraViewSpec::new("secret", |_, _, _, _| {}).restricted());
        t.handle_event(key(KeyCode::Right), Instant::now());
        t.toggle_row(10);

        let now = Instant::now();
        assert_eq!(t.handle_event(key(KeyCode::Char('v')), now), TableAction::DisplayChanged);
        assert_eq!(t.display(), &DisplayAs::Card);
        t.handle_event(key(KeyCode::Char('v')), now);
        assert_eq!(t.display(), &DisplayAs::Extra("chart".to_string()));
        t.handle_event(key(KeyCode::Char('v')), now);
        assert_eq!(t.display(), &DisplayAs::Table);

        assert!(!t.set_display(DisplayAs::Extra("secret".to_string())));
        // paging and selection survived the cycle
        assert_eq!(t.pagination().page(), 2);
        assert_eq!(t.selection_len(), 1);
    }

    #[test]
    fn cursor_moves_within_the_page() {
        let mut t = table(25);
        let now = Instant::now();
        assert_eq!(t.handle_event(key(KeyCode::Up), now), TableAction::None);
        t.handle_event(key(KeyCode::Char('G')), now);
        assert_eq!(t.cursor(), 9);
        assert_eq!(t.cursor_index(), Some(9));
        // clamped at the last row of the page
        assert_eq!(t.handle_event(key(KeyCode::Down), now), TableAction::None);
        t.handle_event(key(KeyCode::Char('g')), now);
        assert_eq!(t.cursor(), 0);
    }
}
