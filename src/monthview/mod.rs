mod layout;
mod state;
mod widget;
pub(crate) use self::state::MonthViewState;
pub(crate) use self::widget::MonthView;
use time::Date;

/// Tells whether a date has open slots
pub(crate) trait SlotLookup {
    fn has_slots(&self, date: Date) -> bool;
}

impl<T: SlotLookup + ?Sized> SlotLookup for &T {
    fn has_slots(&self, date: Date) -> bool {
        (**self).has_slots(date)
    }
}
