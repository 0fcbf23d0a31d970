use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const DAY_STYLE: Style = BASE_STYLE;

pub(crate) const DISABLED_DAY_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const SLOT_MARKER_STYLE: Style = Style::new().fg(Color::LightGreen).bg(Color::Black);

pub(crate) const LOADING_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::ITALIC);

pub(crate) const YEAR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);
