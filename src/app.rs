use crate::help::Help;
use crate::monthview::{MonthView, MonthViewState, SlotLookup};
use crate::theme::BASE_STYLE;
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;
use tracing::info;

const DAYS_IN_WEEK: i64 = 7;

#[derive(Debug)]
pub(crate) struct App<S> {
    view: MonthViewState<S>,
    state: AppState,
}

impl<S: SlotLookup> App<S> {
    pub(crate) fn new(view: MonthViewState<S>) -> App<S> {
        App {
            view,
            state: AppState::Picking,
        }
    }

    /// Runs until the user quits or picks a date, returning the picked date
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<Option<Date>> {
        while !self.finished() {
            self.draw(&mut terminal)?;
            if self.view.needs_redraw() {
                // More months were loaded after the last frame was drawn
                continue;
            }
            self.handle_input()?;
        }
        Ok(self.picked())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = read()?
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or the key had no
    // effect
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Picking => match key {
                KeyCode::Char('h') | KeyCode::Left => self.view.move_cursor(-1).is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.view.move_cursor(1).is_ok(),
                KeyCode::Char('k') | KeyCode::Up => self.view.move_cursor(-DAYS_IN_WEEK).is_ok(),
                KeyCode::Char('j') | KeyCode::Down => self.view.move_cursor(DAYS_IN_WEEK).is_ok(),
                KeyCode::Char('w') | KeyCode::PageUp => self.view.page_up().is_ok(),
                KeyCode::Char('z') | KeyCode::PageDown => self.view.page_down().is_ok(),
                KeyCode::Char('0') | KeyCode::Home => self.view.reset_to_top(),
                KeyCode::Enter | KeyCode::Char(' ') => self.pick(),
                KeyCode::Char('p') => {
                    self.view.toggle_past_dates();
                    true
                }
                KeyCode::Char('x') => self.view.toggle_disabled_at_cursor().is_ok(),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::Picked(_) | AppState::Quitting => false,
        }
    }

    fn pick(&mut self) -> bool {
        let Some(date) = self.view.pick() else {
            return false;
        };
        info!(%date, "date picked");
        self.state = AppState::Picked(date);
        true
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn finished(&self) -> bool {
        matches!(self.state, AppState::Picked(_) | AppState::Quitting)
    }

    fn picked(&self) -> Option<Date> {
        match self.state {
            AppState::Picked(date) => Some(date),
            _ => None,
        }
    }
}

impl<S: SlotLookup> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        MonthView::<S>::new().render(area, buf, &mut self.view);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Picking,
    Helping,
    Picked(Date),
    Quitting,
}
