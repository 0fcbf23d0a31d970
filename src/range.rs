//! Month-partitioned day sequences for a bounded date interval
use std::collections::BTreeSet;
use std::iter::successors;
use time::{Date, Month};
use tracing::trace;

const MONTHS_IN_YEAR: i64 = 12;

/// A single calendar day along with whether it can be picked
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DayEntry {
    pub(crate) date: Date,
    pub(crate) is_disabled: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
// Invariant: Nonempty, and every entry shares the same year & month
pub(crate) struct MonthGroup(Vec<DayEntry>);

impl MonthGroup {
    fn new(first: DayEntry) -> Self {
        MonthGroup(vec![first])
    }

    fn first(&self) -> DayEntry {
        *self.0.first().expect("MonthGroup should be nonempty")
    }

    fn last(&self) -> DayEntry {
        *self.0.last().expect("MonthGroup should be nonempty")
    }

    pub(crate) fn year(&self) -> i32 {
        self.first().date.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.first().date.month()
    }

    pub(crate) fn days(&self) -> &[DayEntry] {
        &self.0
    }

    fn holds(&self, date: Date) -> bool {
        self.year() == date.year() && self.month() == date.month()
    }
}

/// Chronological sequence of month groups covering an inclusive interval
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct CalendarRange(Vec<MonthGroup>);

impl CalendarRange {
    pub(crate) fn months(&self) -> &[MonthGroup] {
        &self.0
    }

    pub(crate) fn month_count(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = DayEntry> + '_ {
        self.0.iter().flat_map(|group| group.days().iter().copied())
    }

    pub(crate) fn day_count(&self) -> usize {
        self.0.iter().map(|group| group.days().len()).sum()
    }

    pub(crate) fn first_day(&self) -> Option<DayEntry> {
        self.0.first().map(MonthGroup::first)
    }

    pub(crate) fn last_day(&self) -> Option<DayEntry> {
        self.0.last().map(MonthGroup::last)
    }

    pub(crate) fn get(&self, date: Date) -> Option<DayEntry> {
        let group = self.0.iter().find(|group| group.holds(date))?;
        let offset = date.day().checked_sub(group.first().date.day())?;
        group.days().get(usize::from(offset)).copied()
    }
}

/// Decides which days of a range are disabled.
///
/// "Today" is part of the policy rather than read from the clock so that
/// building a range is deterministic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DisabledPolicy {
    today: Date,
    allows_past_dates: bool,
    disabled_dates: BTreeSet<Date>,
}

impl DisabledPolicy {
    pub(crate) fn new(today: Date) -> Self {
        DisabledPolicy {
            today,
            allows_past_dates: true,
            disabled_dates: BTreeSet::new(),
        }
    }

    pub(crate) fn allows_past_dates(mut self, allows: bool) -> Self {
        self.allows_past_dates = allows;
        self
    }

    pub(crate) fn disabled_dates<I: IntoIterator<Item = Date>>(mut self, dates: I) -> Self {
        self.disabled_dates.extend(dates);
        self
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn past_dates_allowed(&self) -> bool {
        self.allows_past_dates
    }

    pub(crate) fn toggle_past_dates(&mut self) {
        self.allows_past_dates = !self.allows_past_dates;
    }

    pub(crate) fn toggle_disabled(&mut self, date: Date) {
        if !self.disabled_dates.remove(&date) {
            self.disabled_dates.insert(date);
        }
    }

    pub(crate) fn is_disabled(&self, date: Date) -> bool {
        if !self.allows_past_dates && date < self.today {
            return true;
        }
        self.disabled_dates.contains(&date)
    }

    fn entry(&self, date: Date) -> DayEntry {
        DayEntry {
            date,
            is_disabled: self.is_disabled(date),
        }
    }
}

/// Builds the month-partitioned sequence of every day from `min_date` to
/// `max_date` inclusive.  An inverted interval yields an empty range.
pub(crate) fn build_range(min_date: Date, max_date: Date, policy: &DisabledPolicy) -> CalendarRange {
    let mut months: Vec<MonthGroup> = Vec::new();
    for date in iter_days(min_date, max_date) {
        let entry = policy.entry(date);
        match months.last_mut() {
            Some(group) if group.holds(date) => group.0.push(entry),
            _ => months.push(MonthGroup::new(entry)),
        }
    }
    trace!(%min_date, %max_date, months = months.len(), "built calendar range");
    CalendarRange(months)
}

/// Number of calendar months from `from` to `to`, ignoring the day of month
pub(crate) fn month_distance(from: Date, to: Date) -> i64 {
    month_index(to) - month_index(from)
}

/// Returns the date `months` months after `date`, with the day clamped to
/// the length of the target month.  Returns `None` past the end of time.
pub(crate) fn add_months(date: Date, months: u16) -> Option<Date> {
    let index = month_index(date) + i64::from(months);
    let year = i32::try_from(index.div_euclid(MONTHS_IN_YEAR)).ok()?;
    let month = u8::try_from(index.rem_euclid(MONTHS_IN_YEAR) + 1).ok()?;
    let month = Month::try_from(month).ok()?;
    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
}

fn month_index(date: Date) -> i64 {
    i64::from(date.year()) * MONTHS_IN_YEAR + i64::from(u8::from(date.month())) - 1
}

fn iter_days(start: Date, end: Date) -> impl Iterator<Item = Date> {
    successors(Some(start), |&d| d.next_day()).take_while(move |&d| d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn policy() -> DisabledPolicy {
        DisabledPolicy::new(date!(2024 - 03 - 15))
    }

    #[test]
    fn test_single_day() {
        let range = build_range(date!(2024 - 01 - 15), date!(2024 - 01 - 15), &policy());
        assert_eq!(range.month_count(), 1);
        let group = &range.months()[0];
        assert_eq!(group.year(), 2024);
        assert_eq!(group.month(), Month::January);
        assert_eq!(
            group.days(),
            [DayEntry {
                date: date!(2024 - 01 - 15),
                is_disabled: false
            }]
        );
    }

    #[test]
    fn test_inverted_interval_is_empty() {
        let range = build_range(date!(2024 - 02 - 01), date!(2024 - 01 - 31), &policy());
        assert_eq!(range, CalendarRange::default());
        assert_eq!(range.first_day(), None);
        assert_eq!(range.day_count(), 0);
    }

    #[test]
    fn test_days_are_contiguous() {
        let min = date!(2023 - 11 - 20);
        let max = date!(2024 - 03 - 04);
        let range = build_range(min, max, &policy());
        let dates = range.days().map(|d| d.date).collect::<Vec<_>>();
        assert_eq!(dates.len(), 106);
        assert_eq!(dates.first(), Some(&min));
        assert_eq!(dates.last(), Some(&max));
        for pair in dates.windows(2) {
            assert_eq!(pair[0].next_day(), Some(pair[1]));
        }
    }

    #[test]
    fn test_partial_edge_months() {
        let range = build_range(date!(2023 - 11 - 20), date!(2024 - 03 - 04), &policy());
        let shape = range
            .months()
            .iter()
            .map(|g| (g.year(), g.month(), g.days().len()))
            .collect::<Vec<_>>();
        assert_eq!(
            shape,
            [
                (2023, Month::November, 11),
                (2023, Month::December, 31),
                (2024, Month::January, 31),
                (2024, Month::February, 29),
                (2024, Month::March, 4),
            ]
        );
        for group in range.months() {
            assert!(group
                .days()
                .iter()
                .all(|d| d.date.year() == group.year() && d.date.month() == group.month()));
        }
    }

    #[test]
    fn test_explicitly_disabled_date() {
        let policy = policy().disabled_dates([date!(2024 - 03 - 10)]);
        let range = build_range(date!(2024 - 03 - 01), date!(2024 - 03 - 31), &policy);
        for day in range.days() {
            assert_eq!(
                day.is_disabled,
                day.date == date!(2024 - 03 - 10),
                "wrong flag for {}",
                day.date
            );
        }
    }

    #[test]
    fn test_past_dates_disabled() {
        let policy = policy()
            .allows_past_dates(false)
            .disabled_dates([date!(2024 - 03 - 12), date!(2024 - 03 - 20)]);
        let range = build_range(date!(2024 - 03 - 10), date!(2024 - 03 - 22), &policy);
        let disabled = range
            .days()
            .filter(|d| d.is_disabled)
            .map(|d| d.date.day())
            .collect::<Vec<_>>();
        assert_eq!(disabled, [10, 11, 12, 13, 14, 20]);
    }

    #[test]
    fn test_past_dates_allowed() {
        let range = build_range(date!(2024 - 03 - 10), date!(2024 - 03 - 14), &policy());
        assert!(range.days().all(|d| !d.is_disabled));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let policy = policy()
            .allows_past_dates(false)
            .disabled_dates([date!(2024 - 04 - 01)]);
        let a = build_range(date!(2024 - 02 - 27), date!(2024 - 05 - 02), &policy);
        let b = build_range(date!(2024 - 02 - 27), date!(2024 - 05 - 02), &policy);
        assert_eq!(a, b);
    }

    #[test]
    fn test_get() {
        let range = build_range(date!(2024 - 01 - 20), date!(2024 - 02 - 10), &policy());
        assert_eq!(
            range.get(date!(2024 - 01 - 25)).map(|d| d.date),
            Some(date!(2024 - 01 - 25))
        );
        assert_eq!(
            range.get(date!(2024 - 02 - 10)).map(|d| d.date),
            Some(date!(2024 - 02 - 10))
        );
        assert_eq!(range.get(date!(2024 - 01 - 05)), None);
        assert_eq!(range.get(date!(2024 - 02 - 11)), None);
        assert_eq!(range.get(date!(2024 - 03 - 01)), None);
    }

    #[test]
    fn test_toggle_disabled() {
        let mut policy = policy();
        policy.toggle_disabled(date!(2024 - 04 - 01));
        assert!(policy.is_disabled(date!(2024 - 04 - 01)));
        policy.toggle_disabled(date!(2024 - 04 - 01));
        assert!(!policy.is_disabled(date!(2024 - 04 - 01)));
    }

    #[test]
    fn test_month_distance() {
        assert_eq!(month_distance(date!(2024 - 01 - 31), date!(2024 - 02 - 01)), 1);
        assert_eq!(month_distance(date!(2024 - 01 - 01), date!(2024 - 06 - 30)), 5);
        assert_eq!(month_distance(date!(2023 - 11 - 15), date!(2024 - 02 - 15)), 3);
        assert_eq!(month_distance(date!(2024 - 05 - 01), date!(2024 - 01 - 01)), -4);
    }

    #[test]
    fn test_add_months() {
        assert_eq!(
            add_months(date!(2024 - 01 - 01), 4),
            Some(date!(2024 - 05 - 01))
        );
        assert_eq!(
            add_months(date!(2024 - 01 - 31), 1),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(
            add_months(date!(2023 - 10 - 31), 4),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(
            add_months(date!(2024 - 11 - 15), 14),
            Some(date!(2026 - 01 - 15))
        );
        assert_eq!(add_months(date!(9999 - 12 - 01), 1), None);
    }
}
