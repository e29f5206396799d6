use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

use crate::viewport::ListViewport;

/// Renders `input` at `(x, y)`, truncated to `max_cols` display columns.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    if max_cols == 0 {
        return;
    }
    buf.set_stringn(x, y, input, max_cols as usize, style);
}

/// Renders a styled [`Line`] at `(x, y)`, truncated to `max_cols` display columns.
///
/// Span styles are patched over `base` so a plain line picks up the caller's style
/// while a custom renderer can still override it per span.
pub fn render_line_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    line: &Line<'_>,
    base: Style,
) {
    let right = x.saturating_add(max_cols);
    let mut cx = x;
    for span in &line.spans {
        if cx >= right {
            return;
        }
        let style = base.patch(span.style);
        let (nx, _) = buf.set_stringn(cx, y, span.content.as_ref(), (right - cx) as usize, style);
        cx = nx;
    }
}

/// Display width of a line in terminal columns.
pub fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum()
}

/// Draws a one-column vertical scrollbar for `vp` into `area`.
///
/// When the content fits the viewport the track is cleared instead.
pub fn render_scrollbar(area: Rect, buf: &mut Buffer, vp: &ListViewport, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if vp.content_h == 0 || vp.content_h <= vp.viewport_h as usize {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((vp.viewport_h as f64 / vp.content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;

    let max_offset = vp.content_h.saturating_sub(vp.viewport_h as usize).max(1) as f64;
    let thumb_top = ((vp.offset as f64 / max_offset) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Span;

    #[test]
    fn line_width_sums_spans() {
        let line = Line::from(vec![Span::raw("ab"), Span::raw("你")]);
        assert_eq!(line_width(&line), 4);
    }

    #[test]
    fn clipped_str_respects_budget() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        render_str_clipped(0, 0, 3, &mut buf, "abcdef", Style::default());
        let row: String = (0..10)
            .filter_map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()))
            .collect();
        assert!(row.starts_with("abc "));
    }
}
