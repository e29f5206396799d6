/// Scroll state for a vertical list of fixed-height (one row) items.
///
/// The dropdown and table bodies scroll through this. `offset` is the index of
/// the first visible item; it is always clamped into `[0, max_offset]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListViewport {
    pub offset: usize,
    pub viewport_h: u16,
    pub content_h: usize,
}

impl ListViewport {
    pub fn set_viewport(&mut self, h: u16) {
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, len: usize) {
        self.content_h = len;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = self.offset as i64 + delta as i64;
        self.offset = next.clamp(0, self.max_offset() as i64) as usize;
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    /// Scrolls the minimum amount needed to bring `index` into view.
    pub fn ensure_visible(&mut self, index: usize) {
        if self.viewport_h == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else {
            let last = self.offset + self.viewport_h as usize - 1;
            if index > last {
                self.offset = index + 1 - self.viewport_h as usize;
            }
        }
        self.clamp();
    }

    pub fn is_visible(&self, index: usize) -> bool {
        index >= self.offset && index < self.offset + self.viewport_h as usize
    }

    /// True when the final item of the content is inside the viewport.
    pub fn last_item_visible(&self) -> bool {
        self.content_h > 0 && self.is_visible(self.content_h - 1)
    }

    fn max_offset(&self) -> usize {
        self.content_h.saturating_sub(self.viewport_h as usize)
    }
}
