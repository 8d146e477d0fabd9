pub mod calendar;
pub mod dual;
pub mod field;
pub mod modal;
mod selection;

pub use calendar::{Calendar, CalendarController, DayState, Dropdown, MonthGrid, RangeMode};
pub use dual::{DualCalendar, Side};
pub use field::{ChangeEvent, DatePicker, FieldState, PickerHost, Status, VisualState};
pub use modal::{CalendarLayout, DatePickerModal, DateValue, ModalController, Period};
pub use selection::Selection;

use crate::date;

pub fn iso_to_display(iso: &str) -> String {
    match date::parse_iso(iso) {
        Ok(d) => date::format_display(&d),
        Err(_) => iso.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_to_display_passthrough() {
        assert_eq!(iso_to_display("2025-01-10"), "10/01/2025");
        assert_eq!(iso_to_display("10/01/2025"), "10/01/2025");
        assert_eq!(iso_to_display(""), "");
    }
}
