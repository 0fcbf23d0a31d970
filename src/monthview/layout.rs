use crate::range::{CalendarRange, DayEntry, MonthGroup};
use time::{Date, Month, Weekday, Weekday::*};

const DAYS_IN_WEEK: usize = 7;

pub(super) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
// Invariant: At least one element of the array is Some, and all days belong
// to the same month
pub(super) struct Week([Option<DayEntry>; DAYS_IN_WEEK]);

impl Week {
    fn new(day: DayEntry) -> Self {
        let mut this = Week([None; DAYS_IN_WEEK]);
        this.set(day);
        this
    }

    fn set(&mut self, day: DayEntry) {
        let i = usize::from(day.date.weekday().index0());
        assert!(i < DAYS_IN_WEEK, "weekday index should be less than 7");
        self.0[i] = Some(day);
    }

    pub(super) fn enumerate(&self) -> EnumerateWeek<'_> {
        EnumerateWeek::new(self)
    }

    pub(super) fn get(&self, wd: Weekday) -> Option<DayEntry> {
        self.0.get(usize::from(wd.index0())).copied().flatten()
    }

    fn contains(&self, date: Date) -> bool {
        self.get(date.weekday()).is_some_and(|day| day.date == date)
    }

    fn first_date(&self) -> Date {
        self.0
            .iter()
            .flatten()
            .map(|day| day.date)
            .next()
            .expect("Week should contain at least one Some")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct EnumerateWeek<'a> {
    week: &'a Week,
    next_weekday: Option<Weekday>,
}

impl<'a> EnumerateWeek<'a> {
    fn new(week: &'a Week) -> Self {
        EnumerateWeek {
            week,
            next_weekday: Some(Sunday),
        }
    }
}

impl Iterator for EnumerateWeek<'_> {
    type Item = (Weekday, DayEntry);

    fn next(&mut self) -> Option<(Weekday, DayEntry)> {
        loop {
            let wd = self.next_weekday?;
            self.next_weekday = match wd.next() {
                Sunday => None,
                wd2 => Some(wd2),
            };
            if let Some(day) = self.week.get(wd) {
                return Some((wd, day));
            }
        }
    }
}

/// One line of the scrollable month list
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum ViewLine {
    MonthTitle {
        first: Date,
        // Whether the year is written in the margin regardless of the line's
        // position
        show_year: bool,
    },
    Week(Week),
    Gap,
    Loading,
}

impl ViewLine {
    pub(super) fn year(&self) -> Option<i32> {
        match self {
            ViewLine::MonthTitle { first, .. } => Some(first.year()),
            ViewLine::Week(week) => Some(week.first_date().year()),
            ViewLine::Gap | ViewLine::Loading => None,
        }
    }
}

/// The visible range broken into lines: each month is a title line followed
/// by its weeks, months are separated by a blank line, and a loading line
/// trails a range that is not yet complete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct MonthLayout(Vec<ViewLine>);

impl MonthLayout {
    pub(super) fn new(range: &CalendarRange, loading: bool) -> Self {
        let mut lines = Vec::new();
        for (i, group) in range.months().iter().enumerate() {
            if i > 0 {
                lines.push(ViewLine::Gap);
            }
            push_month(&mut lines, group, i == 0);
        }
        if loading {
            lines.push(ViewLine::Loading);
        }
        MonthLayout(lines)
    }

    pub(super) fn lines(&self) -> &[ViewLine] {
        &self.0
    }

    pub(super) fn height(&self) -> usize {
        self.0.len()
    }

    pub(super) fn line_of(&self, date: Date) -> Option<usize> {
        self.0
            .iter()
            .position(|line| matches!(line, ViewLine::Week(week) if week.contains(date)))
    }
}

fn push_month(lines: &mut Vec<ViewLine>, group: &MonthGroup, is_first: bool) {
    let Some(first) = group.days().first() else {
        return;
    };
    lines.push(ViewLine::MonthTitle {
        first: first.date,
        show_year: is_first || group.month() == Month::January,
    });
    let mut week: Option<Week> = None;
    for &day in group.days() {
        match week.as_mut() {
            Some(w) if day.date.weekday() != Sunday => w.set(day),
            _ => {
                if let Some(w) = week.replace(Week::new(day)) {
                    lines.push(ViewLine::Week(w));
                }
            }
        }
    }
    if let Some(w) = week {
        lines.push(ViewLine::Week(w));
    }
}
