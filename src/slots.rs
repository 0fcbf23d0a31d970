use crate::monthview::SlotLookup;
use std::collections::BTreeSet;
use time::Date;

/// Dates the caller has marked as having open slots
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MarkedDates(BTreeSet<Date>);

impl FromIterator<Date> for MarkedDates {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> Self {
        MarkedDates(iter.into_iter().collect())
    }
}

impl SlotLookup for MarkedDates {
    fn has_slots(&self, date: Date) -> bool {
        self.0.contains(&date)
    }
}
