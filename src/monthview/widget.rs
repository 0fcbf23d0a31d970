use super::layout::{ViewLine, WeekdayExt};
use super::state::MonthViewState;
use super::SlotLookup;
use crate::range::DayEntry;
use crate::theme::{
    DAY_STYLE, DISABLED_DAY_STYLE, LOADING_STYLE, MONTH_STYLE, SLOT_MARKER_STYLE, WEEKDAY_STYLE,
    YEAR_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use std::marker::PhantomData;
use time::Weekday;

/// Width of the calendar in columns, not counting the year in the margin
const MAIN_WIDTH: u16 = 46;

/// Number of columns on the left side of the calendar, used as the margin in
/// which the year is written
const LEFT_MARGIN: u16 = 6;

const TOTAL_WIDTH: u16 = LEFT_MARGIN + MAIN_WIDTH;

/// Number of lines taken up by the header and its rule
const HEADER_LINES: u16 = 2;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Columns between the left edge of a day's cell and its number
const DAY_NUMBER_OFFSET: u16 = 1;

/// Columns between the left edge of a day's cell and its slot marker
const SLOT_MARKER_OFFSET: u16 = 4;

const SLOT_MARKER: &str = "•";

const LOADING_TEXT: &str = " Loading more months…";

const ACS_HLINE: char = '─';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthView<S> {
    _data: PhantomData<S>,
}

impl<S> MonthView<S> {
    pub(crate) fn new() -> MonthView<S> {
        MonthView { _data: PhantomData }
    }
}

impl<S: SlotLookup> StatefulWidget for MonthView<S> {
    type State = MonthViewState<S>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = (area.width.saturating_sub(MAIN_WIDTH) / 2).max(LEFT_MARGIN) - LEFT_MARGIN;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left),
                Constraint::Length(TOTAL_WIDTH.min(area.width)),
                Constraint::Min(0),
            ])
            .split(area);
        let area = chunks[1];
        let viewport = area.height.saturating_sub(HEADER_LINES);
        let layout = state.prepare(usize::from(viewport));
        let locale = state.display_locale();
        let today = state.today();
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_header(locale.weekday_header());
        let shown = layout
            .lines()
            .iter()
            .skip(state.offset())
            .take(usize::from(viewport));
        for (row, line) in std::iter::zip(0u16.., shown) {
            if row == 0 || matches!(line, ViewLine::MonthTitle { show_year: true, .. }) {
                if let Some(year) = line.year() {
                    canvas.draw_year(row, year);
                }
            }
            match line {
                ViewLine::MonthTitle { first, .. } => {
                    canvas.draw_month_title(row, first.weekday(), locale.short_month(first.month()));
                }
                ViewLine::Week(week) => {
                    for (wd, day) in week.enumerate() {
                        let mut style = day_style(day);
                        if day.date == today {
                            style = style.add_modifier(Modifier::UNDERLINED);
                        }
                        if state.is_cursor(day.date) {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        canvas.draw_day(row, wd, show_day(day, state.is_selected(day.date)), style);
                        if state.has_slots(day.date) {
                            canvas.draw_slot_marker(row, wd);
                        }
                    }
                }
                ViewLine::Gap => (),
                ViewLine::Loading => canvas.draw_loading(row),
            }
        }
        state.report_scroll(&layout);
    }
}

fn day_style(day: DayEntry) -> Style {
    if day.is_disabled {
        DISABLED_DAY_STYLE
    } else {
        DAY_STYLE
    }
}

fn show_day(day: DayEntry, is_selected: bool) -> String {
    if is_selected {
        format!("[{:2}]", day.date.day())
    } else {
        format!(" {:2} ", day.date.day())
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_header(&mut self, header: String) {
        self.mvprint(0, LEFT_MARGIN, header, WEEKDAY_STYLE);
        self.hline(1, LEFT_MARGIN, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_year(&mut self, row: u16, year: i32) {
        self.mvprint(row + HEADER_LINES, 0, year.to_string(), YEAR_STYLE);
    }

    // The title starts above the number of the month's first day
    fn draw_month_title(&mut self, row: u16, first_weekday: Weekday, name: &str) {
        self.mvprint(
            row + HEADER_LINES,
            LEFT_MARGIN + DAY_WIDTH * first_weekday.index0() + DAY_NUMBER_OFFSET,
            name,
            MONTH_STYLE,
        );
    }

    fn draw_day(&mut self, row: u16, wd: Weekday, s: String, style: Style) {
        self.mvprint(
            row + HEADER_LINES,
            LEFT_MARGIN + DAY_WIDTH * wd.index0(),
            s,
            style,
        );
    }

    fn draw_slot_marker(&mut self, row: u16, wd: Weekday) {
        self.mvprint(
            row + HEADER_LINES,
            LEFT_MARGIN + DAY_WIDTH * wd.index0() + SLOT_MARKER_OFFSET,
            SLOT_MARKER,
            SLOT_MARKER_STYLE,
        );
    }

    fn draw_loading(&mut self, row: u16) {
        self.mvprint(row + HEADER_LINES, LEFT_MARGIN, LOADING_TEXT, LOADING_STYLE);
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Style::new());
    }
}
