use chrono::{Datelike, Month, NaiveDate};

use super::Selection;
use crate::date::{all_months, MonthCursor, WeekStart};

pub const DEFAULT_YEAR_SPAN: i32 = 10;

/// Receives what a calendar grid wants to happen. The grid itself never
/// changes its cursor or its selection; whoever owns those applies the
/// requests.
pub trait CalendarController {
    fn date_selected(&mut self, _date: NaiveDate) {}
    fn range_selected(&mut self, _start: Option<NaiveDate>, _end: Option<NaiveDate>) {}
    fn month_changed(&mut self, _cursor: MonthCursor) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    Single,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Month,
    Year,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DayState {
    pub selected: bool,
    pub in_range: bool,
    pub start: bool,
    pub end: bool,
    pub single_selected: bool,
    pub today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    cursor: MonthCursor,
    cells: Vec<Option<NaiveDate>>,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;

    pub fn new(cursor: MonthCursor, week_start: WeekStart) -> Self {
        let offset = cursor.first_weekday_offset(week_start) as usize;

        let cells = std::iter::repeat(None)
            .take(offset)
            .chain((1..=cursor.num_days()).map(|day| cursor.day(day)))
            .collect();

        MonthGrid { cursor, cells }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn cells(&self) -> &[Option<NaiveDate>] {
        &self.cells
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_none()).count()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cells.iter().filter_map(|cell| *cell)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<NaiveDate>]> {
        self.cells.chunks(Self::COLUMNS)
    }

    pub fn num_rows(&self) -> usize {
        (self.cells.len() + Self::COLUMNS - 1) / Self::COLUMNS
    }
}

#[derive(Debug, Clone)]
pub struct Calendar {
    cursor: MonthCursor,
    selection: Selection,
    today: NaiveDate,
    hover: Option<NaiveDate>,
    dropdown: Option<Dropdown>,
    mode: RangeMode,
    week_start: WeekStart,
    year_span: i32,
    disabled: bool,
}

impl Calendar {
    pub fn new(cursor: MonthCursor, today: NaiveDate) -> Self {
        Calendar {
            cursor,
            selection: Selection::NoSelection,
            today,
            hover: None,
            dropdown: None,
            mode: RangeMode::Single,
            week_start: WeekStart::default(),
            year_span: DEFAULT_YEAR_SPAN,
            disabled: false,
        }
    }

    pub fn range_mode(mut self, mode: RangeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn year_span(mut self, span: i32) -> Self {
        self.year_span = span;
        self
    }

    pub fn set_cursor(&mut self, cursor: MonthCursor) {
        self.cursor = cursor;
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.dropdown = None;
        }
    }

    pub fn set_range_mode(&mut self, mode: RangeMode) {
        self.mode = mode;
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn get_week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(self.cursor, self.week_start)
    }

    pub fn hover(&mut self, date: NaiveDate) {
        self.hover = Some(date);
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    pub fn hovered(&self) -> Option<NaiveDate> {
        self.hover
    }

    pub fn classify(&self, date: &NaiveDate) -> DayState {
        let start = self.selection.start().as_ref() == Some(date);

        DayState {
            selected: self.selection.contains(date),
            in_range: self
                .selection
                .preview(self.hover)
                .map_or(false, |(from, to)| from <= *date && *date <= to),
            start,
            end: self.selection.end().as_ref() == Some(date),
            single_selected: start && self.selection.is_in_progress(),
            today: *date == self.today,
        }
    }

    pub fn previous_month(&mut self, controller: &mut impl CalendarController) {
        controller.month_changed(self.cursor.pred());
    }

    pub fn next_month(&mut self, controller: &mut impl CalendarController) {
        controller.month_changed(self.cursor.succ());
    }

    pub fn dropdown(&self) -> Option<Dropdown> {
        self.dropdown
    }

    pub fn toggle_month_dropdown(&mut self) {
        self.toggle_dropdown(Dropdown::Month);
    }

    pub fn toggle_year_dropdown(&mut self) {
        self.toggle_dropdown(Dropdown::Year);
    }

    fn toggle_dropdown(&mut self, which: Dropdown) {
        if self.disabled {
            return;
        }
        self.dropdown = if self.dropdown == Some(which) {
            None
        } else {
            Some(which)
        };
    }

    pub fn outside_click(&mut self) {
        self.dropdown = None;
    }

    pub fn month_options(&self) -> &'static [Month] {
        all_months()
    }

    pub fn year_options(&self) -> Vec<i32> {
        let current = self.today.year();
        ((current - self.year_span)..=(current + self.year_span)).collect()
    }

    pub fn choose_month(&mut self, month: Month, controller: &mut impl CalendarController) {
        self.dropdown = None;
        controller.month_changed(self.cursor.with_month(month));
    }

    pub fn choose_year(&mut self, year: i32, controller: &mut impl CalendarController) {
        self.dropdown = None;
        controller.month_changed(self.cursor.with_year(year));
    }

    pub fn click(&mut self, date: NaiveDate, controller: &mut impl CalendarController) {
        if self.disabled {
            log::debug!("Ignoring click on disabled calendar ({})", date);
            return;
        }

        self.dropdown = None;
        controller.date_selected(date);

        if self.mode == RangeMode::Range {
            let next = self.selection.pick(date);
            controller.range_selected(next.start(), next.end());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[derive(Default)]
    pub(crate) struct Recorder {
        pub dates: Vec<NaiveDate>,
        pub ranges: Vec<(Option<NaiveDate>, Option<NaiveDate>)>,
        pub months: Vec<MonthCursor>,
    }

    impl CalendarController for Recorder {
        fn date_selected(&mut self, date: NaiveDate) {
            self.dates.push(date);
        }

        fn range_selected(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
            self.ranges.push((start, end));
        }

        fn month_changed(&mut self, cursor: MonthCursor) {
            self.months.push(cursor);
        }
    }

    fn june_2025() -> Calendar {
        Calendar::new(MonthCursor::new(Month::June, 2025), ymd(2025, 6, 10))
    }

    #[test]
    fn grid_has_offset_blanks_then_every_day() {
        for week_start in [WeekStart::Sunday, WeekStart::Monday] {
            for year in 1999..2031 {
                for &month in all_months() {
                    let cursor = MonthCursor::new(month, year);
                    let grid = MonthGrid::new(cursor, week_start);

                    let offset = cursor.first_weekday_offset(week_start) as usize;
                    assert_eq!(grid.leading_blanks(), offset);
                    assert_eq!(grid.days().count() as u32, cursor.num_days());
                    assert_eq!(grid.cells().len(), offset + cursor.num_days() as usize);
                    assert!(grid.days().all(|d| cursor.contains(&d)));
                }
            }
        }
    }

    #[test]
    fn grid_rows_are_seven_wide() {
        let grid = june_2025().week_start(WeekStart::Monday).grid();
        // June 2025 starts on a Sunday: 6 blanks + 30 days
        assert_eq!(grid.leading_blanks(), 6);
        assert_eq!(grid.num_rows(), 6);
        let rows: Vec<_> = grid.rows().collect();
        assert!(rows[..rows.len() - 1].iter().all(|r| r.len() == 7));
        assert_eq!(rows[0][6], Some(ymd(2025, 6, 1)));
    }

    #[test]
    fn navigation_only_requests() {
        let mut cal = june_2025();
        let mut rec = Recorder::default();

        cal.previous_month(&mut rec);
        cal.next_month(&mut rec);

        assert_eq!(
            rec.months,
            vec![
                MonthCursor::new(Month::May, 2025),
                MonthCursor::new(Month::July, 2025)
            ]
        );
        assert_eq!(cal.cursor(), MonthCursor::new(Month::June, 2025));
    }

    #[test]
    fn dropdowns_substitute_and_close() {
        let mut cal = june_2025();
        let mut rec = Recorder::default();

        cal.toggle_month_dropdown();
        assert_eq!(cal.dropdown(), Some(Dropdown::Month));
        cal.toggle_year_dropdown();
        assert_eq!(cal.dropdown(), Some(Dropdown::Year));

        cal.choose_year(2019, &mut rec);
        assert_eq!(cal.dropdown(), None);

        cal.toggle_month_dropdown();
        cal.choose_month(Month::February, &mut rec);

        assert_eq!(
            rec.months,
            vec![
                MonthCursor::new(Month::June, 2019),
                MonthCursor::new(Month::February, 2025)
            ]
        );

        cal.toggle_month_dropdown();
        cal.outside_click();
        assert_eq!(cal.dropdown(), None);
    }

    #[test]
    fn year_options_span_today() {
        let cal = june_2025();
        let years = cal.year_options();
        assert_eq!(years.len(), 21);
        assert_eq!(years.first(), Some(&2015));
        assert_eq!(years.last(), Some(&2035));
        assert_eq!(cal.month_options().len(), 12);
    }

    #[test]
    fn click_in_single_mode_only_selects_date() {
        let mut cal = june_2025();
        let mut rec = Recorder::default();

        cal.click(ymd(2025, 6, 15), &mut rec);

        assert_eq!(rec.dates, vec![ymd(2025, 6, 15)]);
        assert!(rec.ranges.is_empty());
    }

    #[test]
    fn click_in_range_mode_fires_on_first_click() {
        let mut cal = june_2025().range_mode(RangeMode::Range);
        let mut rec = Recorder::default();

        cal.click(ymd(2025, 6, 20), &mut rec);
        assert_eq!(rec.ranges, vec![(Some(ymd(2025, 6, 20)), None)]);

        cal.set_selection(Selection::RangeInProgress(ymd(2025, 6, 20)));
        cal.click(ymd(2025, 6, 3), &mut rec);
        assert_eq!(
            rec.ranges[1],
            (Some(ymd(2025, 6, 3)), Some(ymd(2025, 6, 20)))
        );
    }

    #[test]
    fn disabled_calendar_ignores_clicks_and_dropdowns() {
        let mut cal = june_2025().range_mode(RangeMode::Range);
        cal.set_disabled(true);
        let mut rec = Recorder::default();

        cal.click(ymd(2025, 6, 20), &mut rec);
        cal.toggle_year_dropdown();

        assert!(rec.dates.is_empty());
        assert!(rec.ranges.is_empty());
        assert_eq!(cal.dropdown(), None);
    }

    #[test]
    fn classify_complete_range() {
        let mut cal = june_2025();
        cal.set_selection(Selection::range(ymd(2025, 6, 5), ymd(2025, 6, 10)));

        let start = cal.classify(&ymd(2025, 6, 5));
        assert!(start.selected && start.start && !start.end && !start.single_selected);

        let inner = cal.classify(&ymd(2025, 6, 7));
        assert!(inner.selected && !inner.start && !inner.end);

        let end = cal.classify(&ymd(2025, 6, 10));
        assert!(end.selected && end.end && end.today);

        assert_eq!(cal.classify(&ymd(2025, 6, 11)), DayState::default());
    }

    #[test]
    fn classify_hover_preview() {
        let mut cal = june_2025();
        cal.set_selection(Selection::RangeInProgress(ymd(2025, 6, 12)));
        cal.hover(ymd(2025, 6, 8));

        let lone = cal.classify(&ymd(2025, 6, 12));
        assert!(lone.selected && lone.start && lone.single_selected && lone.in_range);

        assert!(cal.classify(&ymd(2025, 6, 8)).in_range);
        assert!(cal.classify(&ymd(2025, 6, 10)).in_range);
        assert!(!cal.classify(&ymd(2025, 6, 10)).selected);
        assert!(!cal.classify(&ymd(2025, 6, 13)).in_range);

        cal.clear_hover();
        assert!(!cal.classify(&ymd(2025, 6, 10)).in_range);
    }
}
