use ratatui::style::Style;

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub highlight: Style,
    pub disabled: Style,
    pub header: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Modifier;
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            danger: Style::default().red(),
            highlight: Style::default().add_modifier(Modifier::REVERSED),
            disabled: Style::default().dark_gray().add_modifier(Modifier::DIM),
            header: Style::default().add_modifier(Modifier::BOLD),
        }
    }
}
