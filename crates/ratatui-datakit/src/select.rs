use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui_datakit_core::input::InputEvent;
use ratatui_datakit_core::input::KeyCode;
use ratatui_datakit_core::input::KeyEvent;
use ratatui_datakit_core::render;
use ratatui_datakit_core::theme::Theme;
use ratatui_datakit_core::viewport::ListViewport;
use regex::RegexBuilder;
use serde_json::Value;

use crate::options::OptionSpec;

/// Per-row predicates supplied by the caller.
pub type RowPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type SearchPredicate = Arc<dyn Fn(&Value, &str) -> bool + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub enum SelectAction {
    None,
    Redraw,
    Opened,
    Closed,
    /// The selection changed. Carries the extracted key, the whole row when
    /// `raw_value` is set, or `None` after a clear.
    Changed(Option<Value>),
}

#[derive(Clone, Debug)]
pub struct SelectViewOptions {
    pub clearable: bool,
    pub searchable: bool,
    /// Report the whole matched row to the caller instead of the extracted key.
    pub raw_value: bool,
    /// Filter locally while typing. Off for async selects, where the remote
    /// data source does the matching.
    pub local_filter: bool,
    pub disabled: bool,
    pub loading: bool,
    pub placeholder: Option<String>,
    pub empty_message: String,
    pub option_error_fallback: String,
    pub open_icon: String,
    pub closed_icon: String,
    pub clear_icon: String,
    pub loading_icon: String,
    pub max_dropdown_height: u16,
}

impl Default for SelectViewOptions {
    fn default() -> Self {
        Self {
            clearable: true,
            searchable: true,
            raw_value: false,
            local_filter: true,
            disabled: false,
            loading: false,
            placeholder: None,
            empty_message: "No option found".to_string(),
            option_error_fallback: "error rendering option".to_string(),
            open_icon: "▾".to_string(),
            closed_icon: "▸".to_string(),
            clear_icon: "x".to_string(),
            loading_icon: "~".to_string(),
            max_dropdown_height: 8,
        }
    }
}

/// A searchable single-value dropdown.
///
/// The control moves between `Closed` and `Open`; typing a word character while
/// focused opens the dropdown and starts composing a search term (the first
/// keystroke is folded into the term, never lost). Arrow keys traverse enabled
/// rows with wraparound; Enter selects; Esc closes and resets the filter.
pub struct SelectView {
    pub list: ListViewport,
    options: SelectViewOptions,
    spec: OptionSpec,
    data: Vec<Value>,
    /// Indices into `data` surviving the current search filter.
    filtered: Vec<usize>,
    /// Index into `filtered`.
    highlighted: usize,
    value: Option<Value>,
    open: bool,
    search: String,
    searching: bool,
    extra_loading: bool,
    errors: Vec<String>,
    disabled_option: Option<RowPredicate>,
    on_search: Option<SearchPredicate>,
}

impl SelectView {
    pub fn new(spec: OptionSpec) -> Self {
        Self::with_options(spec, SelectViewOptions::default())
    }

    pub fn with_options(spec: OptionSpec, options: SelectViewOptions) -> Self {
        Self {
            list: ListViewport::default(),
            options,
            spec,
            data: Vec::new(),
            filtered: Vec::new(),
            highlighted: 0,
            value: None,
            open: false,
            search: String::new(),
            searching: false,
            extra_loading: false,
            errors: Vec::new(),
            disabled_option: None,
            on_search: None,
        }
    }

    pub fn options(&self) -> &SelectViewOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SelectViewOptions {
        &mut self.options
    }

    pub fn spec(&self) -> &OptionSpec {
        &self.spec
    }

    /// Marks rows as non-selectable; keyboard traversal skips them.
    pub fn set_disabled_option<F>(&mut self, predicate: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.disabled_option = Some(Arc::new(predicate));
        self.apply_filter();
    }

    /// Replaces the default label-regex matching with a caller predicate.
    pub fn set_on_search<F>(&mut self, predicate: F)
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        self.on_search = Some(Arc::new(predicate));
        self.apply_filter();
    }

    pub fn set_data(&mut self, data: Vec<Value>) {
        self.data = data;
        self.apply_filter();
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Rows surviving the current filter, in display order.
    pub fn filtered_rows(&self) -> impl Iterator<Item = &Value> {
        self.filtered.iter().map(|i| &self.data[*i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn highlighted_row(&self) -> Option<&Value> {
        self.filtered
            .get(self.highlighted)
            .map(|i| &self.data[*i])
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }

    /// The row whose extracted key equals the current value.
    pub fn selected_row(&self) -> Option<&Value> {
        let value = self.value.as_ref()?;
        self.data
            .iter()
            .find(|row| self.spec.key_of(row) == Some(value))
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn set_errors(&mut self, errors: Vec<String>) {
        self.errors = errors;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.options.loading = loading;
    }

    /// Shows a trailing loading row in the dropdown (async page fetch underway).
    pub fn set_extra_loading(&mut self, loading: bool) {
        self.extra_loading = loading;
    }

    /// True while the dropdown shows its final filtered row, the visibility
    /// signal async paging keys off.
    pub fn last_row_visible(&self) -> bool {
        self.open && self.list.last_item_visible()
    }

    pub fn open(&mut self) -> SelectAction {
        if self.open || self.options.disabled || self.options.loading {
            return SelectAction::None;
        }
        self.open = true;
        self.highlighted = self.position_of_value().unwrap_or(0);
        self.normalize_highlight();
        self.list.set_content(self.filtered.len());
        self.list.ensure_visible(self.highlighted);
        SelectAction::Opened
    }

    /// Closes the dropdown, clearing any in-progress search and restoring the
    /// unfiltered row list.
    pub fn close(&mut self) -> SelectAction {
        if !self.open && !self.searching {
            return SelectAction::None;
        }
        self.open = false;
        self.searching = false;
        self.search.clear();
        self.apply_filter();
        self.list.to_top();
        SelectAction::Closed
    }

    pub fn handle_event(&mut self, event: InputEvent) -> SelectAction {
        if self.options.disabled {
            return SelectAction::None;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => self.handle_paste(&text),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> SelectAction {
        if key.is_word_char() {
            if let KeyCode::Char(c) = key.code {
                return self.handle_search_char(c);
            }
        }

        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Down | KeyCode::Up => {
                if !self.open {
                    return self.open();
                }
                let dir = if key.code == KeyCode::Down { 1 } else { -1 };
                if self.step_highlight(dir) {
                    SelectAction::Redraw
                } else {
                    SelectAction::None
                }
            }
            KeyCode::Enter => {
                if !self.open {
                    self.open()
                } else {
                    self.select_highlighted()
                }
            }
            KeyCode::Delete => {
                if self.options.clearable && self.value.is_some() {
                    self.value = None;
                    SelectAction::Changed(None)
                } else {
                    SelectAction::None
                }
            }
            KeyCode::Backspace => {
                if self.searching && !self.search.is_empty() {
                    self.search.pop();
                    self.apply_filter();
                    SelectAction::Redraw
                } else {
                    SelectAction::None
                }
            }
            KeyCode::Char(' ') => {
                if self.searching {
                    self.search.push(' ');
                    self.apply_filter();
                    SelectAction::Redraw
                } else if !self.open {
                    self.open()
                } else {
                    SelectAction::None
                }
            }
            _ => SelectAction::None,
        }
    }

    fn handle_search_char(&mut self, c: char) -> SelectAction {
        if !self.options.searchable {
            return SelectAction::None;
        }
        // a closed, idle control must open before composing; a loading control
        // refuses to open, but an already-searching one keeps accepting edits
        let opened = if !self.open && !self.searching {
            if self.open() == SelectAction::None {
                return SelectAction::None;
            }
            true
        } else {
            false
        };
        self.searching = true;
        self.search.push(c);
        self.apply_filter();
        if opened {
            SelectAction::Opened
        } else {
            SelectAction::Redraw
        }
    }

    fn handle_paste(&mut self, text: &str) -> SelectAction {
        if !self.options.searchable || text.is_empty() {
            return SelectAction::None;
        }
        let opened = if !self.open && !self.searching {
            if self.open() == SelectAction::None {
                return SelectAction::None;
            }
            true
        } else {
            false
        };
        self.searching = true;
        self.search.push_str(text);
        self.apply_filter();
        if opened {
            SelectAction::Opened
        } else {
            SelectAction::Redraw
        }
    }

    fn select_highlighted(&mut self) -> SelectAction {
        let Some(&row_idx) = self.filtered.get(self.highlighted) else {
            return SelectAction::None;
        };
        if !self.enabled_at(self.highlighted) {
            return SelectAction::None;
        }
        let row = self.data[row_idx].clone();
        let key = self.spec.key_of(&row).cloned();
        self.value = key.clone();
        let reported = if self.options.raw_value {
            Some(row)
        } else {
            key
        };
        self.close();
        SelectAction::Changed(reported)
    }

    /// Moves the highlight one enabled row in `dir`, wrapping around the list.
    ///
    /// Disabled rows are skipped; after one full lap without an enabled row the
    /// traversal gives up, so an all-disabled list terminates.
    fn step_highlight(&mut self, dir: i32) -> bool {
        let len = self.filtered.len();
        if len == 0 {
            return false;
        }
        let mut idx = self.highlighted;
        for _ in 0..len {
            idx = if dir > 0 {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
            if self.enabled_at(idx) {
                self.highlighted = idx;
                self.list.ensure_visible(idx);
                return true;
            }
        }
        false
    }

    fn enabled_at(&self, filtered_idx: usize) -> bool {
        let Some(&row_idx) = self.filtered.get(filtered_idx) else {
            return false;
        };
        match &self.disabled_option {
            Some(predicate) => !predicate(&self.data[row_idx]),
            None => true,
        }
    }

    fn position_of_value(&self) -> Option<usize> {
        let value = self.value.as_ref()?;
        self.filtered
            .iter()
            .position(|&i| self.spec.key_of(&self.data[i]) == Some(value))
    }

    fn normalize_highlight(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            self.highlighted = 0;
            return;
        }
        if self.highlighted >= len {
            self.highlighted = 0;
        }
        if !self.enabled_at(self.highlighted) {
            for step in 1..len {
                let idx = (self.highlighted + step) % len;
                if self.enabled_at(idx) {
                    self.highlighted = idx;
                    return;
                }
            }
        }
    }

    /// Recomputes `filtered` from the search term.
    ///
    /// A caller predicate fully determines matches when supplied; otherwise the
    /// label path is tested with a case-insensitive regex (falling back to a
    /// substring match when the term is not a valid pattern). A blank term, or
    /// disabled local filtering, restores the full list.
    fn apply_filter(&mut self) {
        let term = self.search.trim();
        if !self.options.local_filter || !self.searching || term.is_empty() {
            self.filtered = (0..self.data.len()).collect();
        } else if let Some(matcher) = self.on_search.clone() {
            self.filtered = (0..self.data.len())
                .filter(|&i| matcher(&self.data[i], &self.search))
                .collect();
        } else if let Some(label) = self.label_path() {
            let regex = RegexBuilder::new(term).case_insensitive(true).build();
            self.filtered = (0..self.data.len())
                .filter(|&i| {
                    let text = ratatui_datakit_core::path::path_text(&self.data[i], &label);
                    match &regex {
                        Ok(re) => re.is_match(&text),
                        Err(_) => text.to_lowercase().contains(&term.to_lowercase()),
                    }
                })
                .collect();
        } else {
            // custom renderer with no search predicate: nothing to match against
            self.filtered = (0..self.data.len()).collect();
        }

        self.list.set_content(self.filtered.len());
        self.normalize_highlight();
        self.list.ensure_visible(self.highlighted);
    }

    fn label_path(&self) -> Option<String> {
        match &self.spec.content {
            crate::options::OptionContent::Path(label) => Some(label.clone()),
            crate::options::OptionContent::Render(_) => None,
        }
    }

    /// Height the widget wants at `area`: one control line, error lines, and the
    /// dropdown when open.
    pub fn desired_height(&self) -> u16 {
        let mut h = 1 + self.errors.len() as u16;
        if self.open {
            h += self.dropdown_height();
        }
        h
    }

    fn dropdown_height(&self) -> u16 {
        let rows = self.filtered.len() + usize::from(self.extra_loading);
        (rows.max(1) as u16).min(self.options.max_dropdown_height)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        self.render_control(Rect::new(area.x, area.y, area.width, 1), buf, theme);

        let mut y = area.y + 1;
        let bottom = area.y + area.height;
        for error in &self.errors {
            if y >= bottom {
                return;
            }
            render::render_str_clipped(area.x, y, area.width, buf, error, theme.danger);
            y += 1;
        }

        if self.open && y < bottom {
            let h = self.dropdown_height().min(bottom - y);
            self.render_dropdown(Rect::new(area.x, y, area.width, h), buf, theme);
        }
    }

    fn render_control(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let base = if self.options.disabled {
            theme.disabled
        } else {
            theme.text_primary
        };
        buf.set_style(area, base);

        let indicator = if self.options.loading {
            self.options.loading_icon.clone()
        } else if self.open {
            self.options.open_icon.clone()
        } else {
            self.options.closed_icon.clone()
        };
        let show_clear =
            !self.options.loading && self.options.clearable && self.value.is_some();

        let mut right_w = indicator.chars().count() as u16;
        if show_clear {
            right_w += self.options.clear_icon.chars().count() as u16 + 1;
        }
        let content_w = area.width.saturating_sub(right_w + 1);

        if self.searching {
            render::render_str_clipped(area.x, area.y, content_w, buf, &self.search, theme.accent);
        } else if let Some(row) = self.selected_row() {
            let line = self
                .spec
                .render_row(row)
                .unwrap_or_else(|_| Line::from(self.options.option_error_fallback.clone()));
            render::render_line_clipped(area.x, area.y, content_w, buf, &line, base);
        } else if let Some(placeholder) = &self.options.placeholder {
            render::render_str_clipped(
                area.x,
                area.y,
                content_w,
                buf,
                placeholder,
                theme.text_muted,
            );
        }

        let mut x = area.x + area.width.saturating_sub(right_w);
        if show_clear {
            render::render_str_clipped(
                x,
                area.y,
                area.width,
                buf,
                &self.options.clear_icon,
                theme.text_muted,
            );
            x += self.options.clear_icon.chars().count() as u16 + 1;
        }
        render::render_str_clipped(x, area.y, area.width, buf, &indicator, theme.text_muted);
    }

    fn render_dropdown(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let loading_rows = u16::from(self.extra_loading);
        let list_h = area.height.saturating_sub(loading_rows);

        self.list.set_viewport(list_h);
        self.list.set_content(self.filtered.len());
        self.list.ensure_visible(self.highlighted.min(
            self.filtered.len().saturating_sub(1),
        ));

        let show_scrollbar = self.filtered.len() > list_h as usize && area.width >= 2;
        let text_w = if show_scrollbar {
            area.width - 1
        } else {
            area.width
        };

        if self.filtered.is_empty() && !self.extra_loading {
            render::render_str_clipped(
                area.x,
                area.y,
                text_w,
                buf,
                &self.options.empty_message,
                theme.text_muted,
            );
            return;
        }

        for dy in 0..list_h {
            let idx = self.list.offset + dy as usize;
            let Some(&row_idx) = self.filtered.get(idx) else {
                break;
            };
            let row = &self.data[row_idx];
            let is_disabled = !self.enabled_at(idx);
            let is_selected = self.value.is_some() && self.spec.key_of(row) == self.value.as_ref();

            let style = if idx == self.highlighted {
                theme.highlight
            } else if is_disabled {
                theme.disabled
            } else if is_selected {
                theme.accent
            } else {
                theme.text_primary
            };
            buf.set_style(Rect::new(area.x, area.y + dy, text_w, 1), style);

            // one bad row degrades to the fallback, the rest of the list renders
            let line = self
                .spec
                .render_row(row)
                .unwrap_or_else(|_| Line::from(self.options.option_error_fallback.clone()));
            render::render_line_clipped(area.x, area.y + dy, text_w, buf, &line, style);
        }

        if self.extra_loading && area.height > list_h {
            render::render_str_clipped(
                area.x,
                area.y + list_h,
                text_w,
                buf,
                "Loading...",
                theme.text_muted,
            );
        }

        if show_scrollbar {
            render::render_scrollbar(
                Rect::new(area.x + area.width - 1, area.y, 1, list_h),
                buf,
                &self.list,
                theme.text_muted,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({ "id": 1, "label": "Apple" }),
            json!({ "id": 2, "label": "Banana" }),
            json!({ "id": 3, "label": "Cherry" }),
            json!({ "id": 4, "label": "apricot" }),
        ]
    }

    fn select() -> SelectView {
        let mut s = SelectView::new(OptionSpec::labeled("id", "label"));
        s.set_data(rows());
        s
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    #[test]
    fn typing_opens_and_folds_first_keystroke() {
        let mut s = select();
        assert!(!s.is_open());
        let action = s.handle_event(key(KeyCode::Char('a')));
        assert_eq!(action, SelectAction::Opened);
        assert!(s.is_open());
        assert_eq!(s.search_term(), "a");
        // case-insensitive: Apple, Banana, apricot match; Cherry has no "a"
        assert_eq!(s.filtered_len(), 3);

        s.handle_event(key(KeyCode::Char('p')));
        assert_eq!(s.search_term(), "ap");
        assert_eq!(s.filtered_len(), 2);
    }

    #[test]
    fn blank_term_restores_all_rows() {
        let mut s = select();
        s.handle_event(key(KeyCode::Char('z')));
        assert_eq!(s.filtered_len(), 0);
        s.handle_event(key(KeyCode::Backspace));
        assert_eq!(s.filtered_len(), 4);
    }

    #[test]
    fn custom_search_predicate_wins() {
        let mut s = select();
        s.set_on_search(|row, term| {
            row["id"].as_i64().map(|id| id.to_string()) == Some(term.to_string())
        });
        s.handle_event(key(KeyCode::Char('3')));
        assert_eq!(s.filtered_len(), 1);
        assert_eq!(s.highlighted_row().unwrap()["label"], json!("Cherry"));
    }

    #[test]
    fn enter_selects_the_highlighted_row_and_closes() {
        let mut s = select();
        s.handle_event(key(KeyCode::Enter)); // opens
        s.handle_event(key(KeyCode::Down));
        let action = s.handle_event(key(KeyCode::Enter));
        assert_eq!(action, SelectAction::Changed(Some(json!(2))));
        assert!(!s.is_open());
        assert_eq!(s.value(), Some(&json!(2)));
    }

    #[test]
    fn raw_value_reports_the_whole_row() {
        let mut s = select();
        s.options_mut().raw_value = true;
        s.handle_event(key(KeyCode::Enter));
        let action = s.handle_event(key(KeyCode::Enter));
        assert_eq!(
            action,
            SelectAction::Changed(Some(json!({ "id": 1, "label": "Apple" })))
        );
        // the stored value is still the extracted key
        assert_eq!(s.value(), Some(&json!(1)));
    }

    #[test]
    fn closing_resets_search_state() {
        let mut s = select();
        s.handle_event(key(KeyCode::Char('a')));
        s.handle_event(key(KeyCode::Char('p')));
        assert_eq!(s.filtered_len(), 2);
        let action = s.handle_event(key(KeyCode::Esc));
        assert_eq!(action, SelectAction::Closed);
        assert_eq!(s.search_term(), "");
        assert!(!s.is_searching());
        assert_eq!(s.filtered_len(), 4);
    }

    #[test]
    fn traversal_visits_every_enabled_row_once_per_lap() {
        let mut s = select();
        s.set_disabled_option(|row| row["id"] == json!(2));
        s.handle_event(key(KeyCode::Enter));

        let mut seen = Vec::new();
        for _ in 0..3 {
            s.handle_event(key(KeyCode::Down));
            seen.push(s.highlighted_row().unwrap()["id"].clone());
        }
        // starting at Apple(1): 3, 4, back to 1; Banana(2) skipped
        assert_eq!(seen, vec![json!(3), json!(4), json!(1)]);
    }

    #[test]
    fn traversal_wraps_upward_too() {
        let mut s = select();
        s.set_disabled_option(|row| row["id"] == json!(1));
        s.handle_event(key(KeyCode::Enter));
        // highlight normalized off the disabled first row
        assert_eq!(s.highlighted_row().unwrap()["id"], json!(2));
        s.handle_event(key(KeyCode::Up));
        assert_eq!(s.highlighted_row().unwrap()["id"], json!(4));
    }

    #[test]
    fn all_disabled_list_terminates_and_selects_nothing() {
        let mut s = select();
        s.set_disabled_option(|_| true);
        s.handle_event(key(KeyCode::Enter));
        let action = s.handle_event(key(KeyCode::Down));
        assert_eq!(action, SelectAction::None);
        let action = s.handle_event(key(KeyCode::Enter));
        assert_eq!(action, SelectAction::None);
        assert_eq!(s.value(), None);
    }

    #[test]
    fn delete_clears_when_clearable() {
        let mut s = select();
        s.set_value(Some(json!(2)));
        let action = s.handle_event(key(KeyCode::Delete));
        assert_eq!(action, SelectAction::Changed(None));
        assert_eq!(s.value(), None);

        let mut s = select();
        s.options_mut().clearable = false;
        s.set_value(Some(json!(2)));
        assert_eq!(s.handle_event(key(KeyCode::Delete)), SelectAction::None);
        assert_eq!(s.value(), Some(&json!(2)));
    }

    #[test]
    fn disabled_or_loading_control_never_opens() {
        let mut s = select();
        s.options_mut().disabled = true;
        assert_eq!(s.handle_event(key(KeyCode::Enter)), SelectAction::None);

        let mut s = select();
        s.set_loading(true);
        assert_eq!(s.handle_event(key(KeyCode::Char('a'))), SelectAction::None);
        assert!(!s.is_open());
    }

    #[test]
    fn unsearchable_select_ignores_typing() {
        let mut s = select();
        s.options_mut().searchable = false;
        assert_eq!(s.handle_event(key(KeyCode::Char('a'))), SelectAction::None);
        assert!(!s.is_open());
        assert_eq!(s.search_term(), "");
    }

    #[test]
    fn renders_option_failures_as_fallback() {
        use ratatui_datakit_core::error::RenderError;

        let spec = OptionSpec::rendered("id", |row| {
            if row["id"] == json!(2) {
                Err(RenderError::new("bad row"))
            } else {
                Ok(Line::from(row["label"].as_str().unwrap_or("").to_string()))
            }
        });
        let mut s = SelectView::new(spec);
        s.set_data(rows());
        s.handle_event(key(KeyCode::Enter));

        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 10));
        let theme = Theme::default();
        s.render(Rect::new(0, 0, 30, 10), &mut buf, &theme);

        let text: Vec<String> = (0..10)
            .map(|y| {
                (0..30)
                    .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect();
        assert!(text.iter().any(|l| l.contains("Apple")));
        assert!(text.iter().any(|l| l.contains("error rendering option")));
        assert!(text.iter().any(|l| l.contains("Cherry")));
    }

    #[test]
    fn empty_filter_renders_empty_message() {
        let mut s = select();
        s.handle_event(key(KeyCode::Char('z')));
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 5));
        let theme = Theme::default();
        s.render(Rect::new(0, 0, 30, 5), &mut buf, &theme);
        let line: String = (0..30)
            .filter_map(|x| buf.cell((x, 1)).map(|c| c.symbol().to_string()))
            .collect();
        assert!(line.contains("No option found"));
    }
}
