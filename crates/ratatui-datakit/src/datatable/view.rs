use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_datakit_core::render;
use ratatui_datakit_core::theme::Theme;

use crate::datatable::state::DataTableState;
use crate::datatable::state::DisplayAs;
use crate::datatable::state::TableFocus;
use crate::pagination::PageItem;
use crate::pagination::compute_window;

impl DataTableState {
    /// Draws the table: head line, column headings, body (table, card, or an
    /// extra view), and the pager footer.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut y = area.y;
        let bottom = area.y + area.height;

        if !self.options().no_head {
            self.render_head(Rect::new(area.x, y, area.width, 1), buf, theme);
            y += 1;
        }
        if y >= bottom {
            return;
        }

        if let TableFocus::HeaderMenu { cursor } = self.focus() {
            // the menu replaces the body while open
            self.render_header_menu(
                Rect::new(area.x, y, area.width, bottom - y),
                buf,
                theme,
                cursor,
            );
            return;
        }

        // keep one line for the footer when there is room
        let footer = bottom - y > 1;
        let body_h = (bottom - y) - u16::from(footer);
        let body_area = Rect::new(area.x, y, area.width, body_h);

        match self.display().clone() {
            DisplayAs::Table => self.render_table(body_area, buf, theme),
            DisplayAs::Card => self.render_cards(body_area, buf, theme),
            DisplayAs::Extra(key) => {
                if let Some(view) = self.extra_view(&key) {
                    let rows: Vec<_> = self.visible_rows().into_iter().cloned().collect();
                    (view.render.clone())(&rows, body_area, buf, theme);
                }
            }
        }

        if footer {
            self.render_footer(Rect::new(area.x, bottom - 1, area.width, 1), buf, theme);
        }
    }

    fn render_head(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if self.focus() == TableFocus::Search {
            let line = format!("/{}", self.search_input());
            render::render_str_clipped(area.x, area.y, area.width, buf, &line, theme.accent);
            return;
        }

        if self.selection_len() > 0 {
            let mut text = format!("{} selected", self.selection_len());
            for (i, action) in self.bulk_actions().iter().enumerate() {
                text.push_str(&format!("  [{}] {}", i + 1, action.title));
            }
            text.push_str("  Esc cancel");
            render::render_str_clipped(area.x, area.y, area.width, buf, &text, theme.accent);
            return;
        }

        let mut hints = String::from("/ search  h columns  v view");
        if self.options().use_get_as_refresh {
            hints.push_str("  r refresh");
        }
        if self.edit_offered() {
            hints.push_str(&format!("  e {}", self.options().edit_title));
        }
        if self.delete_offered() {
            hints.push_str(&format!("  d {}", self.options().delete_title));
        }
        render::render_str_clipped(area.x, area.y, area.width, buf, &hints, theme.text_muted);
    }

    fn render_header_menu(&self, area: Rect, buf: &mut Buffer, theme: &Theme, cursor: usize) {
        for (i, header) in self.headers().toggleable().enumerate() {
            let y = area.y + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let shown = header.visible || header.always_visible;
            let mark = if shown { "[x]" } else { "[ ]" };
            let text = format!("{mark} {}", header.key);
            let style = if i == cursor {
                theme.highlight
            } else if header.always_visible {
                theme.disabled
            } else {
                theme.text_primary
            };
            render::render_str_clipped(area.x, y, area.width, buf, &text, style);
        }
    }

    fn render_table(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.height == 0 {
            return;
        }
        let marker_w: u16 = if self.options().toggle_rows { 2 } else { 0 };
        let cols: Vec<_> = self.headers().shown().cloned().collect();
        if cols.is_empty() {
            return;
        }
        let col_w = (area.width.saturating_sub(marker_w) / cols.len() as u16).max(1);

        let mut x = area.x + marker_w;
        for col in &cols {
            render::render_str_clipped(
                x,
                area.y,
                col_w.saturating_sub(1),
                buf,
                &col.key.to_uppercase(),
                theme.header,
            );
            x += col_w;
        }

        let rows_area = Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(1));
        if self.is_loading() {
            render::render_str_clipped(
                rows_area.x,
                rows_area.y,
                rows_area.width,
                buf,
                "Loading...",
                theme.text_muted,
            );
            return;
        }

        let indices = self.visible_indices();
        if indices.is_empty() {
            render::render_str_clipped(
                rows_area.x,
                rows_area.y,
                rows_area.width,
                buf,
                &self.options().empty_table,
                theme.text_muted,
            );
            return;
        }

        self.body.set_viewport(rows_area.height);
        self.body.set_content(indices.len());
        self.body.ensure_visible(self.cursor().min(indices.len() - 1));

        let empty_cell = self.options().empty_cell.clone();
        for dy in 0..rows_area.height {
            let at = self.body.offset + dy as usize;
            let Some(&index) = indices.get(at) else {
                break;
            };
            let row = &self.data()[index];
            let y = rows_area.y + dy;

            let base = if at == self.cursor() {
                theme.highlight
            } else {
                theme.text_primary
            };
            buf.set_style(Rect::new(rows_area.x, y, rows_area.width, 1), base);

            if marker_w > 0 && self.is_selected(index) {
                render::render_str_clipped(rows_area.x, y, marker_w, buf, "*", theme.accent);
            }

            let mut x = rows_area.x + marker_w;
            for col in &cols {
                match col.render_cell(row, &empty_cell) {
                    Ok(line) => {
                        render::render_line_clipped(x, y, col_w.saturating_sub(1), buf, &line, base);
                    }
                    Err(_) => {
                        // one bad cell degrades, the rest of the row renders
                        render::render_str_clipped(
                            x,
                            y,
                            col_w.saturating_sub(1),
                            buf,
                            &empty_cell,
                            theme.danger,
                        );
                    }
                }
                x += col_w;
            }
        }
    }

    fn render_cards(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if self.is_loading() {
            render::render_str_clipped(
                area.x,
                area.y,
                area.width,
                buf,
                "Loading...",
                theme.text_muted,
            );
            return;
        }
        let indices = self.visible_indices();
        if indices.is_empty() {
            render::render_str_clipped(
                area.x,
                area.y,
                area.width,
                buf,
                &self.options().empty_table,
                theme.text_muted,
            );
            return;
        }

        let cols: Vec<_> = self.headers().shown().cloned().collect();
        // one card is its fields plus a separator line
        let card_h = cols.len() + 1;
        let per_screen = (area.height as usize / card_h.max(1)).max(1);
        self.body.set_viewport(per_screen as u16);
        self.body.set_content(indices.len());
        self.body.ensure_visible(self.cursor().min(indices.len() - 1));

        let empty_cell = self.options().empty_cell.clone();
        let mut y = area.y;
        for at in self.body.offset..indices.len() {
            if y + cols.len() as u16 > area.y + area.height {
                break;
            }
            let index = indices[at];
            let row = &self.data()[index];
            let base = if at == self.cursor() {
                theme.highlight
            } else {
                theme.text_primary
            };

            for col in &cols {
                let label = format!("{}: ", col.key.to_uppercase());
                render::render_str_clipped(area.x, y, area.width, buf, &label, theme.header);
                let x = area.x + label.chars().count() as u16;
                let w = area.width.saturating_sub(label.chars().count() as u16);
                match col.render_cell(row, &empty_cell) {
                    Ok(line) => render::render_line_clipped(x, y, w, buf, &line, base),
                    Err(_) => {
                        render::render_str_clipped(x, y, w, buf, &empty_cell, theme.danger)
                    }
                }
                y += 1;
            }
            y += 1;
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let total_pages = self.pagination().total_pages();
        if total_pages == 0 {
            return;
        }
        let window = compute_window(self.pagination().page(), total_pages, 1);

        let mut x = area.x;
        let right = area.x + area.width;
        let mut put = |x: &mut u16, text: &str, style| {
            if *x >= right {
                return;
            }
            render::render_str_clipped(*x, area.y, right - *x, buf, text, style);
            *x = (*x as usize + text.chars().count() + 1).min(right as usize) as u16;
        };

        for item in &window {
            match item {
                PageItem::Page(p) => {
                    let style = if *p == self.pagination().page() {
                        theme.accent
                    } else {
                        theme.text_muted
                    };
                    put(&mut x, &p.to_string(), style);
                }
                PageItem::Ellipsis => put(&mut x, "…", theme.text_muted),
            }
        }
        let summary = format!(
            "  {} rows",
            self.pagination().total()
        );
        put(&mut x, &summary, theme.text_muted);
    }
}
