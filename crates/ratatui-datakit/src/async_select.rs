use std::time::Duration;
use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_datakit_core::debounce::Debounce;
use ratatui_datakit_core::input::InputEvent;
use ratatui_datakit_core::theme::Theme;
use serde_json::Value;

use crate::options::OptionSpec;
use crate::select::SelectAction;
use crate::select::SelectView;
use crate::select::SelectViewOptions;

/// Where the remote-paging state machine currently is.
///
/// At most one request is outstanding: next-page triggers are ignored unless the
/// phase is `Idle`, and `Exhausted` stays put until a search resets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Fetching { page: usize, seq: u64 },
    Exhausted,
}

/// A page request for the caller to execute against its data source.
///
/// Feed the outcome back with [`AsyncSelectView::apply_page`] or
/// [`AsyncSelectView::fetch_failed`], quoting `seq` so superseded responses can
/// be recognized and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub page: usize,
    pub limit: usize,
    pub term: String,
    pub seq: u64,
}

#[derive(Clone, Debug)]
pub struct AsyncSelectViewOptions {
    pub limit: usize,
    pub search_timeout: Duration,
    pub select: SelectViewOptions,
}

impl Default for AsyncSelectViewOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            search_timeout: Duration::from_millis(500),
            select: SelectViewOptions::default(),
        }
    }
}

/// [`SelectView`] over paged remote data.
///
/// The view never performs I/O. The app calls [`poll`](Self::poll) from its
/// event loop; when a page is wanted (first open, last row scrolled into view,
/// or a debounced search firing) it hands back a [`FetchRequest`]. Pages append
/// to the accumulated rows; a search reset discards them and starts over at
/// page 1. Responses carry the request's sequence number, so a slow reply
/// overtaken by a newer request is dropped instead of clobbering fresher state.
pub struct AsyncSelectView {
    select: SelectView,
    phase: FetchPhase,
    page: usize,
    limit: usize,
    seq: u64,
    started: bool,
    debounce: Debounce,
    rows: Vec<Value>,
}

impl AsyncSelectView {
    pub fn new(spec: OptionSpec) -> Self {
        Self::with_options(spec, AsyncSelectViewOptions::default())
    }

    pub fn with_options(spec: OptionSpec, options: AsyncSelectViewOptions) -> Self {
        let mut select_options = options.select;
        // matching happens on the server; the wrapped select must not re-filter
        select_options.local_filter = false;
        Self {
            select: SelectView::with_options(spec, select_options),
            phase: FetchPhase::Idle,
            page: 1,
            limit: options.limit.max(1),
            seq: 0,
            started: false,
            debounce: Debounce::new(options.search_timeout),
            rows: Vec::new(),
        }
    }

    pub fn select(&self) -> &SelectView {
        &self.select
    }

    pub fn select_mut(&mut self) -> &mut SelectView {
        &mut self.select
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, FetchPhase::Fetching { .. })
    }

    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> SelectAction {
        let term_before = self.select.search_term().to_string();
        let action = self.select.handle_event(event);
        // an edited term re-arms the debounce; the close-reset does not, because
        // closing also leaves searching mode
        if self.select.is_searching() && self.select.search_term() != term_before {
            self.debounce.schedule(now);
        }
        action
    }

    /// Drives the paging state machine; call once per event-loop turn.
    ///
    /// Returns a request when one should start: the initial page-1 fetch, a
    /// debounced search firing (accumulated rows and counters reset), or the
    /// next page once the last row has become visible.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        if !self.started {
            self.started = true;
            return self.begin_fetch();
        }

        if self.debounce.fire(now) {
            self.rows.clear();
            self.select.set_data(Vec::new());
            self.page = 1;
            // also invalidates any in-flight page: its seq can no longer match
            self.phase = FetchPhase::Idle;
            return self.begin_fetch();
        }

        if self.phase == FetchPhase::Idle && self.select.last_row_visible() {
            return self.begin_fetch();
        }

        None
    }

    fn begin_fetch(&mut self) -> Option<FetchRequest> {
        if self.phase != FetchPhase::Idle {
            return None;
        }
        self.seq += 1;
        self.phase = FetchPhase::Fetching {
            page: self.page,
            seq: self.seq,
        };
        self.sync_loading();
        Some(FetchRequest {
            page: self.page,
            limit: self.limit,
            term: self.select.search_term().to_string(),
            seq: self.seq,
        })
    }

    /// Appends a fetched page. `has_more` decides whether another page is
    /// fetchable. Responses whose `seq` no longer matches the outstanding
    /// request are dropped.
    pub fn apply_page(&mut self, seq: u64, page_rows: Vec<Value>, has_more: bool) {
        let FetchPhase::Fetching { seq: current, .. } = self.phase else {
            tracing::debug!(seq, "page response with no fetch outstanding; dropping");
            return;
        };
        if seq != current {
            tracing::debug!(seq, current, "stale page response; dropping");
            return;
        }

        self.rows.extend(page_rows);
        self.select.set_data(self.rows.clone());
        self.page += 1;
        self.phase = if has_more {
            FetchPhase::Idle
        } else {
            FetchPhase::Exhausted
        };
        self.sync_loading();
    }

    /// Records a failed fetch: logged, loading cleared, accumulated rows kept.
    pub fn fetch_failed(&mut self, seq: u64, error: impl std::fmt::Display) {
        tracing::warn!(seq, %error, "select page fetch failed");
        if let FetchPhase::Fetching { seq: current, .. } = self.phase
            && current == seq
        {
            self.phase = FetchPhase::Idle;
            self.sync_loading();
        }
    }

    fn sync_loading(&mut self) {
        let fetching = self.is_fetching();
        self.select.set_loading(fetching && self.rows.is_empty());
        self.select
            .set_extra_loading(fetching && !self.rows.is_empty());
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.select.render(area, buf, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_datakit_core::input::KeyCode;
    use ratatui_datakit_core::input::KeyEvent;
    use serde_json::json;

    fn page(start: i64, n: i64) -> Vec<Value> {
        (start..start + n)
            .map(|i| json!({ "id": i, "label": format!("row {i}") }))
            .collect()
    }

    fn view() -> AsyncSelectView {
        AsyncSelectView::with_options(
            OptionSpec::labeled("id", "label"),
            AsyncSelectViewOptions {
                limit: 2,
                ..Default::default()
            },
        )
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    #[test]
    fn initial_poll_requests_page_one() {
        let mut v = view();
        let req = v.poll(Instant::now()).expect("initial fetch");
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 2);
        assert_eq!(req.term, "");
        assert!(v.is_fetching());
        // no duplicate while outstanding
        assert!(v.poll(Instant::now()).is_none());
    }

    #[test]
    fn pages_accumulate_in_order_with_the_inflight_guard() {
        let mut v = view();
        let now = Instant::now();

        let req1 = v.poll(now).unwrap();
        v.apply_page(req1.seq, page(0, 2), true);
        assert_eq!(v.rows().len(), 2);
        assert_eq!(v.phase(), FetchPhase::Idle);

        // open and scroll to the last row to trigger the next page
        v.select_mut().handle_event(key(KeyCode::Enter));
        v.select_mut().list.set_viewport(4);
        v.select_mut().list.set_content(2);
        assert!(v.select().last_row_visible());

        let req2 = v.poll(now).expect("second page");
        assert_eq!(req2.page, 2);
        // guard: a third fetch cannot start before the second resolves
        assert!(v.poll(now).is_none());

        v.apply_page(req2.seq, page(2, 2), true);
        assert_eq!(v.rows().len(), 4);
        let ids: Vec<i64> = v.rows().iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn exhausted_source_stops_paging() {
        let mut v = view();
        let now = Instant::now();
        let req = v.poll(now).unwrap();
        v.apply_page(req.seq, page(0, 1), false);
        assert_eq!(v.phase(), FetchPhase::Exhausted);

        v.select_mut().handle_event(key(KeyCode::Enter));
        v.select_mut().list.set_viewport(4);
        assert!(v.poll(now).is_none());
    }

    #[test]
    fn debounced_search_resets_and_refetches() {
        let mut v = view();
        let t0 = Instant::now();
        let req = v.poll(t0).unwrap();
        v.apply_page(req.seq, page(0, 2), false);
        assert_eq!(v.phase(), FetchPhase::Exhausted);

        v.handle_event(key(KeyCode::Char('a')), t0);
        assert!(v.poll(t0).is_none()); // debounce not elapsed
        let req = v
            .poll(t0 + Duration::from_millis(600))
            .expect("search fetch");
        assert_eq!(req.page, 1);
        assert_eq!(req.term, "a");
        assert!(v.rows().is_empty());
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut v = view();
        let t0 = Instant::now();
        let req1 = v.poll(t0).unwrap();
        v.apply_page(req1.seq, page(0, 2), true);

        v.select_mut().handle_event(key(KeyCode::Enter));
        v.select_mut().list.set_viewport(4);
        let old = v.poll(t0).expect("second page");

        // a search typed while page 2 is in flight supersedes it
        v.handle_event(key(KeyCode::Char('q')), t0);
        let fresh = v
            .poll(t0 + Duration::from_millis(600))
            .expect("search fetch");
        assert_ne!(old.seq, fresh.seq);
        assert_eq!(fresh.page, 1);
        assert_eq!(fresh.term, "q");

        // the slow page-2 reply lands late: ignored
        v.apply_page(old.seq, page(2, 2), true);
        assert!(v.rows().is_empty());
        assert!(v.is_fetching());

        v.apply_page(fresh.seq, page(10, 2), false);
        assert_eq!(v.rows().len(), 2);
        assert_eq!(v.phase(), FetchPhase::Exhausted);
    }

    #[test]
    fn failed_fetch_releases_the_guard_and_keeps_rows() {
        let mut v = view();
        let now = Instant::now();
        let req1 = v.poll(now).unwrap();
        v.apply_page(req1.seq, page(0, 2), true);

        v.select_mut().handle_event(key(KeyCode::Enter));
        v.select_mut().list.set_viewport(4);
        let req2 = v.poll(now).unwrap();
        v.fetch_failed(req2.seq, "connection reset");

        assert_eq!(v.phase(), FetchPhase::Idle);
        assert_eq!(v.rows().len(), 2);
        // retry is possible
        assert!(v.poll(now).is_some());
    }
}
