use std::io;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crossterm::event::Event;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui_datakit::crossterm_input::input_event_from_crossterm;
use ratatui_datakit::datatable::ActionGate;
use ratatui_datakit::datatable::BulkActionSpec;
use ratatui_datakit::datatable::DataTableState;
use ratatui_datakit::datatable::HeaderSpec;
use ratatui_datakit::datatable::TableAction;
use ratatui_datakit::datatable::TableFocus;
use ratatui_datakit::input::InputEvent;
use ratatui_datakit::input::KeyCode;
use ratatui_datakit::theme::Theme;
use serde_json::Value;
use serde_json::json;

fn dataset() -> Vec<Value> {
    let groups = ["engineering", "design", "support"];
    (0..45)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user {i:02}"),
                "contact": { "email": format!("user{i:02}@example.com") },
                "group": groups[i % groups.len()],
                "active": i % 4 != 0,
            })
        })
        .collect()
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();

    let mut table = DataTableState::new(vec![
        HeaderSpec::path("name", "name").pinned(),
        HeaderSpec::path("email", "contact.email"),
        HeaderSpec::path("group", "group"),
        HeaderSpec::path("active", "active").hidden(),
    ]);
    table.set_data(dataset());
    table.set_bulk_actions(vec![
        BulkActionSpec::new("Archive"),
        BulkActionSpec::new("Export"),
    ]);
    table.set_can_edit(ActionGate::Allow);
    table.set_can_delete(ActionGate::When(Arc::new(|row| {
        row["active"] == json!(false)
    })));

    let res = run(&mut terminal, &theme, &mut table);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend<Error = io::Error>>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    table: &mut DataTableState,
) -> io::Result<()> {
    let mut last_action = String::new();
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let [main, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .areas(area);

            let buf = f.buffer_mut();
            table.render(main, buf, theme);

            let status_line = format!(
                "page {}/{}  {}  (q quits)",
                table.pagination().page(),
                table.pagination().total_pages().max(1),
                last_action,
            );
            let status_span = Span::styled(status_line, Style::default());
            buf.set_span(status.x, status.y, &status_span, status.width);
        })?;

        if crossterm::event::poll(Duration::from_millis(50))? {
            let ev = crossterm::event::read()?;
            if let Event::Key(_) = &ev
                && let Some(ev) = input_event_from_crossterm(ev)
            {
                if table.focus() == TableFocus::Body
                    && matches!(&ev, InputEvent::Key(k) if k.code == KeyCode::Char('q'))
                {
                    return Ok(());
                }

                match table.handle_event(ev, Instant::now()) {
                    TableAction::Activated(i) => last_action = format!("activated row {i}"),
                    TableAction::Edit(i) => last_action = format!("edit row {i}"),
                    TableAction::Delete(i) => last_action = format!("delete row {i}"),
                    TableAction::Bulk { index, rows } => {
                        last_action = format!("bulk #{index} over {} rows", rows.len());
                        table.clear_selection();
                    }
                    TableAction::SelectionChanged
                    | TableAction::DisplayChanged
                    | TableAction::Redraw
                    | TableAction::None => {}
                }
            }
        }
    }
}
