use chrono::{Month, NaiveDate};

use super::calendar::{Calendar, CalendarController, Dropdown, RangeMode};
use super::Selection;
use crate::date::{MonthCursor, WeekStart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

struct Forward<'a, C> {
    outer: &'a mut C,
    picked: Option<Selection>,
}

impl<C: CalendarController> CalendarController for Forward<'_, C> {
    fn date_selected(&mut self, date: NaiveDate) {
        self.outer.date_selected(date);
    }

    fn range_selected(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.picked = Some(Selection::from_bounds(start, end));
    }
}

#[derive(Default)]
struct CursorRequest(Option<MonthCursor>);

impl CalendarController for CursorRequest {
    fn month_changed(&mut self, cursor: MonthCursor) {
        self.0 = Some(cursor);
    }
}

#[derive(Debug, Clone)]
pub struct DualCalendar {
    left: Calendar,
    right: Calendar,
    temp: Selection,
}

impl DualCalendar {
    pub fn new(cursor: MonthCursor, today: NaiveDate) -> Self {
        DualCalendar {
            left: Calendar::new(cursor, today).range_mode(RangeMode::Range),
            right: Calendar::new(cursor.succ(), today).range_mode(RangeMode::Range),
            temp: Selection::NoSelection,
        }
    }

    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.left = self.left.week_start(week_start);
        self.right = self.right.week_start(week_start);
        self
    }

    pub fn year_span(mut self, span: i32) -> Self {
        self.left = self.left.year_span(span);
        self.right = self.right.year_span(span);
        self
    }

    pub fn calendar(&self, side: Side) -> &Calendar {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn calendar_mut(&mut self, side: Side) -> &mut Calendar {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn left_cursor(&self) -> MonthCursor {
        self.left.cursor()
    }

    pub fn right_cursor(&self) -> MonthCursor {
        self.right.cursor()
    }

    pub fn selection(&self) -> Selection {
        self.temp
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.left.set_today(today);
        self.right.set_today(today);
    }

    pub fn set_right_disabled(&mut self, disabled: bool) {
        self.right.set_disabled(disabled);
    }

    pub fn is_right_disabled(&self) -> bool {
        self.right.is_disabled()
    }

    pub fn set_cursor(&mut self, cursor: MonthCursor) {
        self.left.set_cursor(cursor);
        self.right.set_cursor(cursor.succ());
    }

    fn set_temp(&mut self, selection: Selection) {
        self.temp = selection;
        self.left.set_selection(selection);
        self.right.set_selection(selection);
    }

    pub fn sync(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        let incoming = Selection::from_bounds(start, end);
        if incoming != self.temp {
            self.set_temp(incoming);
        }
    }

    pub fn click(&mut self, side: Side, date: NaiveDate, controller: &mut impl CalendarController) {
        if side == Side::Right && self.right.is_disabled() {
            log::debug!("Right calendar is disabled, ignoring {}", date);
            return;
        }

        let mut forward = Forward {
            outer: &mut *controller,
            picked: None,
        };
        self.calendar_mut(side).click(date, &mut forward);
        let picked = forward.picked;

        if let Some(picked) = picked {
            self.set_temp(picked);
            controller.range_selected(picked.start(), picked.end());
        }
    }

    pub fn month_changed(&mut self, side: Side, cursor: MonthCursor) {
        match side {
            Side::Left => self.set_cursor(cursor),
            Side::Right => self.set_cursor(cursor.pred()),
        }
    }

    fn navigate(&mut self, side: Side, nav: impl FnOnce(&mut Calendar, &mut CursorRequest)) {
        let mut request = CursorRequest::default();
        nav(self.calendar_mut(side), &mut request);
        if let Some(cursor) = request.0 {
            self.month_changed(side, cursor);
        }
    }

    pub fn previous_month(&mut self, side: Side) {
        self.navigate(side, |cal, req| cal.previous_month(req));
    }

    pub fn next_month(&mut self, side: Side) {
        self.navigate(side, |cal, req| cal.next_month(req));
    }

    pub fn choose_month(&mut self, side: Side, month: Month) {
        self.navigate(side, |cal, req| cal.choose_month(month, req));
    }

    pub fn choose_year(&mut self, side: Side, year: i32) {
        self.navigate(side, |cal, req| cal.choose_year(year, req));
    }

    pub fn toggle_dropdown(&mut self, side: Side, which: Dropdown) {
        let other = match side {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        };
        self.calendar_mut(other).outside_click();

        let cal = self.calendar_mut(side);
        match which {
            Dropdown::Month => cal.toggle_month_dropdown(),
            Dropdown::Year => cal.toggle_year_dropdown(),
        }
    }

    pub fn outside_click(&mut self) {
        self.left.outside_click();
        self.right.outside_click();
    }

    pub fn hover(&mut self, date: NaiveDate) {
        self.left.hover(date);
        self.right.hover(date);
    }

    pub fn clear_hover(&mut self) {
        self.left.clear_hover();
        self.right.clear_hover();
    }

    pub fn side_of(&self, date: &NaiveDate) -> Option<Side> {
        if self.left.cursor().contains(date) {
            Some(Side::Left)
        } else if self.right.cursor().contains(date) {
            Some(Side::Right)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::calendar::tests::{ymd, Recorder};

    fn january_2025() -> DualCalendar {
        DualCalendar::new(MonthCursor::new(Month::January, 2025), ymd(2025, 1, 15))
    }

    fn assert_coupled(dual: &DualCalendar) {
        assert_eq!(dual.right_cursor(), dual.left_cursor() + 1);
    }

    #[test]
    fn cursors_stay_one_month_apart() {
        let mut dual = january_2025();
        assert_coupled(&dual);

        let steps: [fn(&mut DualCalendar); 9] = [
            |d| d.next_month(Side::Left),
            |d| d.next_month(Side::Right),
            |d| d.previous_month(Side::Right),
            |d| d.previous_month(Side::Left),
            |d| d.choose_month(Side::Right, Month::December),
            |d| d.choose_month(Side::Left, Month::December),
            |d| d.choose_year(Side::Right, 2030),
            |d| d.choose_year(Side::Left, 2016),
            |d| d.previous_month(Side::Right),
        ];

        for step in steps.iter().cycle().take(40) {
            step(&mut dual);
            assert_coupled(&dual);
        }
    }

    #[test]
    fn right_navigation_moves_left_too() {
        let mut dual = january_2025();
        dual.choose_month(Side::Right, Month::January);
        assert_eq!(dual.left_cursor(), MonthCursor::new(Month::December, 2024));
        assert_eq!(dual.right_cursor(), MonthCursor::new(Month::January, 2025));
    }

    #[test]
    fn range_across_both_grids() {
        let mut dual = january_2025();
        let mut rec = Recorder::default();

        dual.click(Side::Right, ymd(2025, 2, 3), &mut rec);
        dual.click(Side::Left, ymd(2025, 1, 20), &mut rec);

        assert_eq!(
            rec.ranges,
            vec![
                (Some(ymd(2025, 2, 3)), None),
                (Some(ymd(2025, 1, 20)), Some(ymd(2025, 2, 3)))
            ]
        );
        assert_eq!(rec.dates, vec![ymd(2025, 2, 3), ymd(2025, 1, 20)]);
        assert_eq!(
            dual.calendar(Side::Left).selection(),
            dual.calendar(Side::Right).selection()
        );
    }

    #[test]
    fn disabled_right_side_ignores_clicks() {
        let mut dual = january_2025();
        dual.set_right_disabled(true);
        let mut rec = Recorder::default();

        dual.click(Side::Right, ymd(2025, 2, 3), &mut rec);
        assert!(rec.ranges.is_empty());
        assert!(dual.selection().is_empty());

        dual.click(Side::Left, ymd(2025, 1, 3), &mut rec);
        assert_eq!(rec.ranges, vec![(Some(ymd(2025, 1, 3)), None)]);
    }

    #[test]
    fn sync_clears_when_owner_clears() {
        let mut dual = january_2025();
        let mut rec = Recorder::default();
        dual.click(Side::Left, ymd(2025, 1, 3), &mut rec);

        dual.sync(None, None);
        assert!(dual.selection().is_empty());
        assert!(dual.calendar(Side::Right).selection().is_empty());
    }

    #[test]
    fn sync_takes_derived_range() {
        let mut dual = january_2025();
        let mut rec = Recorder::default();
        dual.click(Side::Left, ymd(2025, 1, 3), &mut rec);

        dual.sync(Some(ymd(2025, 1, 3)), Some(ymd(2026, 1, 3)));
        assert_eq!(
            dual.selection(),
            Selection::RangeComplete(ymd(2025, 1, 3), ymd(2026, 1, 3))
        );

        // A finished range means the next click starts over
        dual.click(Side::Left, ymd(2025, 1, 9), &mut rec);
        assert_eq!(dual.selection(), Selection::RangeInProgress(ymd(2025, 1, 9)));
    }

    #[test]
    fn sync_keeps_in_flight_start() {
        let mut dual = january_2025();
        let mut rec = Recorder::default();
        dual.click(Side::Left, ymd(2025, 1, 3), &mut rec);

        dual.sync(Some(ymd(2025, 1, 3)), None);
        assert_eq!(dual.selection(), Selection::RangeInProgress(ymd(2025, 1, 3)));
    }

    #[test]
    fn sync_drops_cleared_end() {
        let mut dual = january_2025();
        let mut rec = Recorder::default();
        dual.click(Side::Left, ymd(2025, 1, 1), &mut rec);
        dual.click(Side::Left, ymd(2025, 1, 10), &mut rec);

        dual.sync(Some(ymd(2025, 1, 1)), None);
        assert_eq!(dual.selection(), Selection::RangeInProgress(ymd(2025, 1, 1)));
        assert_eq!(
            dual.calendar(Side::Right).selection(),
            Selection::RangeInProgress(ymd(2025, 1, 1))
        );

        dual.click(Side::Left, ymd(2025, 1, 5), &mut rec);
        assert_eq!(
            dual.selection(),
            Selection::RangeComplete(ymd(2025, 1, 1), ymd(2025, 1, 5))
        );
    }

    #[test]
    fn sync_ignores_end_without_start() {
        let mut dual = january_2025();
        let mut rec = Recorder::default();
        dual.click(Side::Left, ymd(2025, 1, 1), &mut rec);
        dual.click(Side::Left, ymd(2025, 1, 10), &mut rec);

        dual.sync(None, Some(ymd(2025, 1, 10)));
        assert!(dual.selection().is_empty());
    }

    #[test]
    fn dropdowns_are_exclusive_across_sides() {
        let mut dual = january_2025();
        dual.toggle_dropdown(Side::Left, Dropdown::Month);
        dual.toggle_dropdown(Side::Right, Dropdown::Year);

        assert_eq!(dual.calendar(Side::Left).dropdown(), None);
        assert_eq!(dual.calendar(Side::Right).dropdown(), Some(Dropdown::Year));

        dual.outside_click();
        assert_eq!(dual.calendar(Side::Right).dropdown(), None);
    }

    #[test]
    fn side_lookup() {
        let dual = january_2025();
        assert_eq!(dual.side_of(&ymd(2025, 1, 31)), Some(Side::Left));
        assert_eq!(dual.side_of(&ymd(2025, 2, 1)), Some(Side::Right));
        assert_eq!(dual.side_of(&ymd(2025, 3, 1)), None);
    }
}
