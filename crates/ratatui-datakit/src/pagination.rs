use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_datakit_core::input::InputEvent;
use ratatui_datakit_core::input::KeyCode;
use ratatui_datakit_core::input::KeyEvent;
use ratatui_datakit_core::render;
use ratatui_datakit_core::theme::Theme;

/// One slot of the page-number window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Computes which page numbers (and ellipsis markers) to display.
///
/// `siblings` is the count of page links shown on each side of the current page.
/// The result always contains `1`, `total_pages`, and the (clamped) current page,
/// with page numbers strictly increasing. A boundary page adjacent to the window
/// edge joins the run directly, so `1 … 2` artifacts never appear.
pub fn compute_window(page: usize, total_pages: usize, siblings: usize) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    let page = page.clamp(1, total_pages);
    let span = siblings * 2;

    let (start, end) = if page <= span + 2 {
        (1, (span + 3).min(total_pages))
    } else if page + span + 1 > total_pages {
        (total_pages.saturating_sub(span + 2).max(1), total_pages)
    } else {
        (page - siblings, page + siblings)
    };

    let mut items = Vec::new();
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    for p in start..=end {
        items.push(PageItem::Page(p));
    }
    if end < total_pages {
        if end + 1 < total_pages {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}

/// Page/limit/total bookkeeping shared by the pager control and the data table.
///
/// Invariants: `page >= 1`, `limit >= 1`, and `page <= max(total_pages, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
    page: usize,
    limit: usize,
    total: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
        }
    }
}

impl PaginationState {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let mut s = Self {
            page: page.max(1),
            limit: limit.max(1),
            total,
        };
        s.reclamp();
        s
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.limit)
    }

    /// Sets the current page; out-of-range requests are rejected.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages().max(1) {
            return false;
        }
        self.page = page;
        true
    }

    /// Advances one page; a no-op on the last page.
    pub fn next(&mut self) -> bool {
        if self.page >= self.total_pages() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Goes back one page; a no-op on the first page.
    pub fn prev(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Changes the page size, re-clamping the current page.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.reclamp();
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.reclamp();
    }

    /// Index of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }

    /// `[start, end)` bounds for slicing `len` locally-held rows.
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = self.offset().min(len);
        let end = (self.offset() + self.limit).min(len);
        (start, end)
    }

    fn reclamp(&mut self) {
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationAction {
    None,
    Redraw,
    Changed(usize),
}

#[derive(Clone, Debug)]
pub struct PaginationViewOptions {
    pub siblings: usize,
    pub disabled: bool,
    pub prev_label: String,
    pub next_label: String,
    pub ellipsis: String,
    pub style: Style,
    pub active_style: Style,
}

impl Default for PaginationViewOptions {
    fn default() -> Self {
        Self {
            siblings: 1,
            disabled: false,
            prev_label: "Prev".to_string(),
            next_label: "Next".to_string(),
            ellipsis: "…".to_string(),
            style: Style::default(),
            active_style: Style::default(),
        }
    }
}

/// An interactive pager: `Prev 1 … 4 [5] 6 … 9 Next`.
///
/// Left/Right step one page, Home/End jump to the boundaries. Steps past a
/// boundary and re-activating the current page emit nothing; when `disabled`
/// every event is ignored.
pub struct PaginationView {
    state: PaginationState,
    options: PaginationViewOptions,
}

impl PaginationView {
    pub fn new(state: PaginationState) -> Self {
        Self {
            state,
            options: PaginationViewOptions::default(),
        }
    }

    pub fn with_options(state: PaginationState, options: PaginationViewOptions) -> Self {
        Self { state, options }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PaginationState {
        &mut self.state
    }

    pub fn options(&self) -> &PaginationViewOptions {
        &self.options
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.options.disabled = disabled;
    }

    pub fn handle_event(&mut self, event: InputEvent) -> PaginationAction {
        if self.options.disabled {
            return PaginationAction::None;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(_) => PaginationAction::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> PaginationAction {
        let changed = match key.code {
            KeyCode::Left => self.state.prev(),
            KeyCode::Right => self.state.next(),
            KeyCode::Home => self.state.page() != 1 && self.state.set_page(1),
            KeyCode::End => {
                let last = self.state.total_pages().max(1);
                self.state.page() != last && self.state.set_page(last)
            }
            _ => return PaginationAction::None,
        };
        if changed {
            PaginationAction::Changed(self.state.page())
        } else {
            PaginationAction::None
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let base = if self.options.disabled {
            theme.disabled
        } else if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        let active = self.options.active_style.patch(theme.accent);
        let muted = theme.text_muted;

        let total_pages = self.state.total_pages();
        let window = compute_window(self.state.page(), total_pages, self.options.siblings);

        let mut x = area.x;
        let right = area.x + area.width;
        let mut put = |x: &mut u16, text: &str, style: Style| {
            if *x >= right {
                return;
            }
            render::render_str_clipped(*x, area.y, right - *x, buf, text, style);
            *x = (*x as usize + text.chars().count() + 1).min(right as usize) as u16;
        };

        let prev_style = if self.state.page() <= 1 { muted } else { base };
        put(&mut x, &self.options.prev_label, prev_style);

        for item in &window {
            match item {
                PageItem::Page(p) => {
                    let style = if *p == self.state.page() { active } else { base };
                    put(&mut x, &p.to_string(), style);
                }
                PageItem::Ellipsis => put(&mut x, &self.options.ellipsis, muted),
            }
        }

        let next_style = if self.state.page() >= total_pages {
            muted
        } else {
            base
        };
        put(&mut x, &self.options.next_label, next_style);
    }
}
