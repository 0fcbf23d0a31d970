use crate::range::{add_months, build_range, month_distance, CalendarRange, DisabledPolicy};
use std::fmt;
use time::Date;
use tracing::{debug, info, trace};

/// Number of months past the minimum date that are built before the user
/// scrolls near the bottom
pub(crate) const DEFAULT_CAPPED_MONTHS: u16 = 4;

/// The inputs that define a loader's ranges.  Changing any of them means
/// starting over.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RangeInputs {
    pub(crate) min_date: Date,
    pub(crate) max_date: Date,
    pub(crate) policy: DisabledPolicy,
}

/// Scroll position as reported by the display layer, in lines
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ScrollMetrics {
    pub(crate) layout_height: usize,
    pub(crate) offset_y: usize,
    pub(crate) content_height: usize,
}

impl ScrollMetrics {
    /// Whether the bottom of the viewport is within a third of a viewport of
    /// the end of the content
    pub(crate) fn is_close_to_bottom(&self) -> bool {
        let padding_to_bottom = self.layout_height / 3;
        self.layout_height.saturating_add(self.offset_y)
            >= self.content_height.saturating_sub(padding_to_bottom)
    }
}

/// Callback handed over by the display layer that scrolls the view back to
/// its origin
pub(crate) struct ResetHandle(Box<dyn Fn()>);

impl ResetHandle {
    pub(crate) fn new<F: Fn() + 'static>(func: F) -> Self {
        ResetHandle(Box::new(func))
    }
}

impl fmt::Debug for ResetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetHandle(..)")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct LoadState {
    full: CalendarRange,
    // `None` once everything is loaded
    capped: Option<CalendarRange>,
}

impl LoadState {
    fn new(inputs: &RangeInputs, capped_months: u16) -> Self {
        let RangeInputs {
            min_date,
            max_date,
            ref policy,
        } = *inputs;
        let full = build_range(min_date, max_date, policy);
        let capped = (month_distance(min_date, max_date) > i64::from(capped_months))
            .then(|| {
                let capped_max =
                    add_months(min_date, capped_months).map_or(max_date, |d| d.min(max_date));
                build_range(min_date, capped_max, policy)
            })
            .filter(|c| c.month_count() != full.month_count());
        debug!(
            %min_date,
            %max_date,
            months = full.month_count(),
            days = full.day_count(),
            capped_months = ?capped.as_ref().map(CalendarRange::month_count),
            "initialized month loader"
        );
        LoadState { full, capped }
    }
}

/// Exposes a capped prefix of a date range to the display layer and swaps
/// in the whole range once the user scrolls close to the bottom.
#[derive(Debug)]
pub(crate) struct ProgressiveMonthLoader {
    inputs: RangeInputs,
    capped_months: u16,
    state: LoadState,
    reset: Option<ResetHandle>,
}

impl ProgressiveMonthLoader {
    pub(crate) fn new(inputs: RangeInputs, capped_months: u16) -> Self {
        let state = LoadState::new(&inputs, capped_months);
        ProgressiveMonthLoader {
            inputs,
            capped_months,
            state,
            reset: None,
        }
    }

    pub(crate) fn inputs(&self) -> &RangeInputs {
        &self.inputs
    }

    /// Discards all load state and starts over from the capped range if the
    /// inputs differ from the current ones.  Returns whether anything was
    /// rebuilt.
    pub(crate) fn reinitialize(&mut self, inputs: RangeInputs) -> bool {
        if inputs == self.inputs {
            return false;
        }
        self.state = LoadState::new(&inputs, self.capped_months);
        self.inputs = inputs;
        true
    }

    pub(crate) fn visible_range(&self) -> &CalendarRange {
        self.state.capped.as_ref().unwrap_or(&self.state.full)
    }

    pub(crate) fn is_fully_loaded(&self) -> bool {
        self.visible_range().month_count() == self.state.full.month_count()
    }

    /// Loads the rest of the range if the scroll position is close to the
    /// bottom.  Returns `true` if the visible range changed.
    pub(crate) fn on_scroll_progress(&mut self, metrics: ScrollMetrics) -> bool {
        trace!(?metrics, "scroll progress");
        if self.is_fully_loaded() || !metrics.is_close_to_bottom() {
            return false;
        }
        self.state.capped = None;
        info!(
            months = self.state.full.month_count(),
            "loaded remaining months"
        );
        true
    }

    pub(crate) fn register_reset_handle(&mut self, handle: ResetHandle) {
        if self.reset.replace(handle).is_some() {
            debug!("replaced previously registered reset handle");
        }
    }

    /// Invokes the registered reset handle.  Returns `false` if none has been
    /// registered.
    pub(crate) fn reset_to_top(&self) -> bool {
        match self.reset {
            Some(ResetHandle(ref func)) => {
                func();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use time::{macros::date, Month};

    fn inputs(min_date: Date, max_date: Date) -> RangeInputs {
        RangeInputs {
            min_date,
            max_date,
            policy: DisabledPolicy::new(date!(2024 - 01 - 01)),
        }
    }

    const NEAR_BOTTOM: ScrollMetrics = ScrollMetrics {
        layout_height: 30,
        offset_y: 70,
        content_height: 100,
    };

    const NEAR_TOP: ScrollMetrics = ScrollMetrics {
        layout_height: 30,
        offset_y: 0,
        content_height: 100,
    };

    #[test]
    fn test_close_to_bottom() {
        assert!(NEAR_BOTTOM.is_close_to_bottom());
        assert!(!NEAR_TOP.is_close_to_bottom());
        // Exactly a third of a viewport away from the end
        let edge = ScrollMetrics {
            layout_height: 30,
            offset_y: 60,
            content_height: 100,
        };
        assert!(edge.is_close_to_bottom());
        let short = ScrollMetrics {
            offset_y: 59,
            ..edge
        };
        assert!(!short.is_close_to_bottom());
        // Content shorter than the viewport
        let tiny = ScrollMetrics {
            layout_height: 30,
            offset_y: 0,
            content_height: 10,
        };
        assert!(tiny.is_close_to_bottom());
    }

    #[test]
    fn test_capped_then_full() {
        let mut loader = ProgressiveMonthLoader::new(
            inputs(date!(2024 - 01 - 01), date!(2024 - 06 - 30)),
            4,
        );
        assert!(!loader.is_fully_loaded());
        let visible = loader.visible_range();
        assert_eq!(visible.month_count(), 5);
        assert_eq!(visible.months()[4].month(), Month::May);
        assert_eq!(visible.last_day().map(|d| d.date), Some(date!(2024 - 05 - 01)));
        assert!(loader.on_scroll_progress(NEAR_BOTTOM));
        assert!(loader.is_fully_loaded());
        let visible = loader.visible_range();
        assert_eq!(visible.month_count(), 6);
        assert_eq!(visible.day_count(), 182);
        assert_eq!(visible.last_day().map(|d| d.date), Some(date!(2024 - 06 - 30)));
    }

    #[test]
    fn test_visible_is_prefix_of_full() {
        let loader = ProgressiveMonthLoader::new(
            inputs(date!(2023 - 12 - 12), date!(2025 - 02 - 03)),
            4,
        );
        let capped = loader.visible_range().days().collect::<Vec<_>>();
        let full = build_range(
            date!(2023 - 12 - 12),
            date!(2025 - 02 - 03),
            &loader.inputs().policy,
        );
        let full = full.days().collect::<Vec<_>>();
        assert!(capped.len() < full.len());
        assert_eq!(capped, full[..capped.len()]);
    }

    #[test]
    fn test_short_range_is_already_full() {
        let loader = ProgressiveMonthLoader::new(
            inputs(date!(2024 - 01 - 31), date!(2024 - 05 - 01)),
            4,
        );
        assert!(loader.is_fully_loaded());
        assert_eq!(loader.visible_range().month_count(), 5);
    }

    #[test]
    fn test_far_from_bottom_stays_capped() {
        let mut loader = ProgressiveMonthLoader::new(
            inputs(date!(2024 - 01 - 01), date!(2024 - 12 - 31)),
            4,
        );
        for _ in 0..5 {
            assert!(!loader.on_scroll_progress(NEAR_TOP));
        }
        assert!(!loader.is_fully_loaded());
    }

    #[test]
    fn test_monotonic_and_idempotent() {
        let mut loader = ProgressiveMonthLoader::new(
            inputs(date!(2024 - 01 - 01), date!(2024 - 12 - 31)),
            2,
        );
        let mut day_count = loader.visible_range().day_count();
        for metrics in [NEAR_TOP, NEAR_BOTTOM, NEAR_TOP, NEAR_BOTTOM, NEAR_BOTTOM] {
            loader.on_scroll_progress(metrics);
            let now = loader.visible_range().day_count();
            assert!(now >= day_count);
            day_count = now;
        }
        assert_eq!(day_count, 366);
        assert!(!loader.on_scroll_progress(NEAR_BOTTOM));
        assert_eq!(loader.visible_range().day_count(), 366);
    }

    #[test]
    fn test_reinitialize_discards_expansion() {
        let mut loader = ProgressiveMonthLoader::new(
            inputs(date!(2024 - 01 - 01), date!(2024 - 12 - 31)),
            4,
        );
        assert!(loader.on_scroll_progress(NEAR_BOTTOM));
        assert!(loader.is_fully_loaded());
        let mut new_inputs = loader.inputs().clone();
        new_inputs.policy.toggle_past_dates();
        assert!(loader.reinitialize(new_inputs.clone()));
        assert!(!loader.is_fully_loaded());
        assert_eq!(loader.visible_range().month_count(), 5);
        assert!(!loader.reinitialize(new_inputs));
    }

    #[test]
    fn test_inverted_interval() {
        let mut loader = ProgressiveMonthLoader::new(
            inputs(date!(2024 - 06 - 01), date!(2024 - 01 - 01)),
            4,
        );
        assert!(loader.is_fully_loaded());
        assert_eq!(loader.visible_range(), &CalendarRange::default());
        assert!(!loader.on_scroll_progress(NEAR_BOTTOM));
    }

    #[test]
    fn test_reset_handle() {
        let mut loader = ProgressiveMonthLoader::new(
            inputs(date!(2024 - 01 - 01), date!(2024 - 01 - 31)),
            4,
        );
        assert!(!loader.reset_to_top());
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        loader.register_reset_handle(ResetHandle::new(move || counter.set(counter.get() + 1)));
        assert!(loader.reset_to_top());
        assert!(loader.reset_to_top());
        assert_eq!(calls.get(), 2);
        let mut new_inputs = loader.inputs().clone();
        new_inputs.max_date = date!(2024 - 12 - 31);
        assert!(loader.reinitialize(new_inputs));
        assert!(loader.reset_to_top());
        assert_eq!(calls.get(), 3);
    }
}
