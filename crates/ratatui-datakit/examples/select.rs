use std::io;
use std::time::Duration;
use std::time::Instant;

use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyModifiers;
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
use ratatui_datakit::async_select::AsyncSelectView;
use ratatui_datakit::async_select::AsyncSelectViewOptions;
use ratatui_datakit::crossterm_input::input_event_from_crossterm;
use ratatui_datakit::options::OptionSpec;
use ratatui_datakit::select::SelectAction;
use ratatui_datakit::theme::Theme;
use serde_json::Value;
use serde_json::json;

fn dataset() -> Vec<Value> {
    let names = [
        "Apple", "Apricot", "Banana", "Blueberry", "Cherry", "Cranberry", "Date", "Elderberry",
        "Fig", "Grape", "Guava", "Kiwi", "Lemon", "Lime", "Mango", "Melon", "Orange", "Papaya",
        "Peach", "Pear", "Pineapple", "Plum", "Raspberry", "Strawberry",
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": i, "label": name }))
        .collect()
}

/// Serves one page of the dataset the way a paged HTTP endpoint would.
fn serve(data: &[Value], page: usize, limit: usize, term: &str) -> (Vec<Value>, bool) {
    let term = term.to_lowercase();
    let matches: Vec<Value> = data
        .iter()
        .filter(|row| {
            term.is_empty()
                || row["label"]
                    .as_str()
                    .is_some_and(|l| l.to_lowercase().contains(&term))
        })
        .cloned()
        .collect();
    let start = (page - 1) * limit;
    let end = (start + limit).min(matches.len());
    let rows = matches.get(start..end).map(<[Value]>::to_vec).unwrap_or_default();
    (rows, end < matches.len())
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let data = dataset();

    let mut select = AsyncSelectView::with_options(
        OptionSpec::labeled("id", "label"),
        AsyncSelectViewOptions {
            limit: 8,
            ..Default::default()
        },
    );
    select.select_mut().options_mut().placeholder = Some("Pick a fruit".to_string());

    let res = run(&mut terminal, &theme, &data, &mut select);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend<Error = io::Error>>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    data: &[Value],
    select: &mut AsyncSelectView,
) -> io::Result<()> {
    let mut last_change = String::new();
    loop {
        if let Some(req) = select.poll(Instant::now()) {
            let (rows, has_more) = serve(data, req.page, req.limit, &req.term);
            select.apply_page(req.seq, rows, has_more);
        }

        terminal.draw(|f| {
            let area = f.area();
            let [main, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .areas(area);

            let buf = f.buffer_mut();
            select.render(main, buf, theme);

            let fetched = select.rows().len();
            let status_line =
                format!("fetched={fetched}  {last_change}  (type to search, Ctrl-C quits)");
            let status_span = Span::styled(status_line, Style::default());
            buf.set_span(status.x, status.y, &status_span, status.width);
        })?;

        if crossterm::event::poll(Duration::from_millis(50))? {
            let ev = crossterm::event::read()?;
            if let Event::Key(key) = &ev
                && key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            {
                return Ok(());
            }

            if let Some(ev) = input_event_from_crossterm(ev)
                && let SelectAction::Changed(value) = select.handle_event(ev, Instant::now())
            {
                last_change = match value {
                    Some(v) => format!("picked {v}"),
                    None => "cleared".to_string(),
                };
            }
        }
    }
}
