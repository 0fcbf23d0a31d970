use super::layout::MonthLayout;
use super::SlotLookup;
use crate::loader::{ProgressiveMonthLoader, RangeInputs, ResetHandle, ScrollMetrics};
use crate::locale::Locale;
use crate::range::DayEntry;
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use time::{Date, Duration};
use tracing::debug;

#[derive(Debug)]
pub(crate) struct MonthViewState<S> {
    loader: ProgressiveMonthLoader,
    slots: S,
    locale: Locale,
    // Shared with the reset handle registered with `loader`
    offset: Rc<Cell<usize>>,
    viewport: usize,
    content_height: usize,
    cursor: Option<Date>,
    selected: Option<Date>,
    follow_cursor: bool,
    // Set when the range grew after the last frame was drawn
    stale: bool,
}

impl<S: SlotLookup> MonthViewState<S> {
    pub(crate) fn new(mut loader: ProgressiveMonthLoader, slots: S) -> Self {
        let offset = Rc::new(Cell::new(0));
        let handle_offset = Rc::clone(&offset);
        loader.register_reset_handle(ResetHandle::new(move || handle_offset.set(0)));
        let mut state = MonthViewState {
            loader,
            slots,
            locale: Locale::default(),
            offset,
            viewport: 0,
            content_height: 0,
            cursor: None,
            selected: None,
            follow_cursor: false,
            stale: false,
        };
        state.clamp_cursor();
        state
    }

    pub(crate) fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub(crate) fn selected(mut self, date: Date) -> Self {
        self.selected = Some(date);
        if self.loader.visible_range().get(date).is_some() {
            self.cursor = Some(date);
            self.follow_cursor = true;
        }
        self
    }

    pub(super) fn display_locale(&self) -> Locale {
        self.locale
    }

    pub(super) fn today(&self) -> Date {
        self.loader.inputs().policy.today()
    }

    pub(super) fn offset(&self) -> usize {
        self.offset.get()
    }

    pub(super) fn is_cursor(&self, date: Date) -> bool {
        self.cursor == Some(date)
    }

    pub(super) fn is_selected(&self, date: Date) -> bool {
        self.selected == Some(date)
    }

    pub(super) fn has_slots(&self, date: Date) -> bool {
        self.slots.has_slots(date)
    }

    /// Lays out the visible range for a viewport of the given height and
    /// settles the scroll offset.  The loader is not consulted until the
    /// frame has been drawn; see `report_scroll()`.
    pub(super) fn prepare(&mut self, viewport: usize) -> MonthLayout {
        self.viewport = viewport;
        let layout = self.layout();
        self.settle(&layout);
        self.content_height = layout.height();
        self.follow_cursor = false;
        layout
    }

    /// Reports the scroll position of the frame just drawn from `layout` to
    /// the loader.  If that loads the remaining months, the drawn frame is
    /// stale and `needs_redraw()` returns `true` once.
    pub(super) fn report_scroll(&mut self, layout: &MonthLayout) {
        if self.loader.on_scroll_progress(self.scroll_metrics(layout)) {
            self.content_height = self.layout().height();
            self.stale = true;
        }
    }

    pub(crate) fn needs_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.stale, false)
    }

    fn layout(&self) -> MonthLayout {
        MonthLayout::new(self.loader.visible_range(), !self.loader.is_fully_loaded())
    }

    fn scroll_metrics(&self, layout: &MonthLayout) -> ScrollMetrics {
        ScrollMetrics {
            layout_height: self.viewport,
            offset_y: self.offset.get(),
            content_height: layout.height(),
        }
    }

    fn settle(&mut self, layout: &MonthLayout) {
        let max_offset = layout.height().saturating_sub(self.viewport);
        let mut offset = self.offset.get().min(max_offset);
        if self.follow_cursor && self.viewport > 0 {
            if let Some(line) = self.cursor.and_then(|date| layout.line_of(date)) {
                if line < offset {
                    // Keep the month title above the cursor's week in view
                    offset = line.saturating_sub(1);
                } else if line >= offset + self.viewport {
                    offset = (line + 1 - self.viewport).min(max_offset);
                }
            }
        }
        self.offset.set(offset);
    }

    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport)
    }

    pub(crate) fn scroll_down(&self, lines: usize) -> Result<(), OutOfRangeError> {
        let current = self.offset.get();
        let max_offset = self.max_offset();
        if current >= max_offset {
            return Err(OutOfRangeError);
        }
        self.offset.set(current.saturating_add(lines).min(max_offset));
        Ok(())
    }

    pub(crate) fn scroll_up(&self, lines: usize) -> Result<(), OutOfRangeError> {
        let current = self.offset.get();
        if current == 0 {
            return Err(OutOfRangeError);
        }
        self.offset.set(current.saturating_sub(lines));
        Ok(())
    }

    pub(crate) fn page_down(&self) -> Result<(), OutOfRangeError> {
        self.scroll_down(self.viewport.max(1))
    }

    pub(crate) fn page_up(&self) -> Result<(), OutOfRangeError> {
        self.scroll_up(self.viewport.max(1))
    }

    /// Scrolls back to the first month through the loader's reset handle
    pub(crate) fn reset_to_top(&self) -> bool {
        self.loader.reset_to_top()
    }

    /// Moves the cursor by `days`, stopping at the ends of the visible range
    pub(crate) fn move_cursor(&mut self, days: i64) -> Result<(), OutOfRangeError> {
        let range = self.loader.visible_range();
        let (Some(first), Some(last), Some(cursor)) =
            (range.first_day(), range.last_day(), self.cursor)
        else {
            return Err(OutOfRangeError);
        };
        let target = cursor
            .checked_add(Duration::days(days))
            .map_or(last.date, |d| d.clamp(first.date, last.date));
        if target == cursor {
            return Err(OutOfRangeError);
        }
        self.cursor = Some(target);
        self.follow_cursor = true;
        Ok(())
    }

    /// Selects the date under the cursor unless it is disabled
    pub(crate) fn pick(&mut self) -> Option<Date> {
        let day = self.cursor_entry().filter(|day| !day.is_disabled)?;
        self.selected = Some(day.date);
        Some(day.date)
    }

    fn cursor_entry(&self) -> Option<DayEntry> {
        self.cursor
            .and_then(|date| self.loader.visible_range().get(date))
    }

    pub(crate) fn toggle_past_dates(&mut self) {
        let mut inputs = self.loader.inputs().clone();
        inputs.policy.toggle_past_dates();
        self.reload(inputs);
    }

    pub(crate) fn toggle_disabled_at_cursor(&mut self) -> Result<(), OutOfRangeError> {
        let cursor = self.cursor.ok_or(OutOfRangeError)?;
        let mut inputs = self.loader.inputs().clone();
        inputs.policy.toggle_disabled(cursor);
        self.reload(inputs);
        Ok(())
    }

    fn reload(&mut self, inputs: RangeInputs) {
        if self.loader.reinitialize(inputs) {
            debug!(
                allows_past_dates = self.loader.inputs().policy.past_dates_allowed(),
                "month view inputs changed"
            );
            self.clamp_cursor();
            self.follow_cursor = true;
        }
    }

    // Puts the cursor back inside the visible range, preferring the first
    // enabled day
    fn clamp_cursor(&mut self) {
        let range = self.loader.visible_range();
        if self.cursor.and_then(|date| range.get(date)).is_none() {
            self.cursor = range
                .days()
                .find(|day| !day.is_disabled)
                .or_else(|| range.first_day())
                .map(|day| day.date);
        }
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Option<Date> {
        self.cursor
    }

    #[cfg(test)]
    pub(crate) fn is_fully_loaded(&self) -> bool {
        self.loader.is_fully_loaded()
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot move past the displayed dates")]
pub(crate) struct OutOfRangeError;
