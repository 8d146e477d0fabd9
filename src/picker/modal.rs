use chrono::{Month, NaiveDate};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::calendar::{Calendar, CalendarController, Dropdown, RangeMode};
use super::dual::{DualCalendar, Side};
use super::Selection;
use crate::date::{self, add_years, DisplayValue, MonthCursor, WeekStart};
use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Period {
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "2years")]
    TwoYears,
    #[serde(rename = "3years")]
    ThreeYears,
    #[serde(rename = "5years")]
    FiveYears,
}

impl Default for Period {
    fn default() -> Self {
        Period::Custom
    }
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::Custom,
        Period::Current,
        Period::OneYear,
        Period::TwoYears,
        Period::ThreeYears,
        Period::FiveYears,
    ];

    pub fn years(&self) -> Option<i32> {
        match self {
            Period::Custom | Period::Current => None,
            Period::OneYear => Some(1),
            Period::TwoYears => Some(2),
            Period::ThreeYears => Some(3),
            Period::FiveYears => Some(5),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Custom => "Custom",
            Period::Current => "Current",
            Period::OneYear => "1 Year",
            Period::TwoYears => "2 Years",
            Period::ThreeYears => "3 Years",
            Period::FiveYears => "5 Years",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Custom => "custom",
            Period::Current => "current",
            Period::OneYear => "1year",
            Period::TwoYears => "2years",
            Period::ThreeYears => "3years",
            Period::FiveYears => "5years",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .iter()
            .find(|p| p.as_str() == s.trim())
            .copied()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::ParseError,
                    &format!("Unknown period '{}'", s),
                )
            })
    }
}

/// Text that does not parse as `DD/MM/YYYY` is kept verbatim and handed
/// out unchanged on apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    Empty,
    Date(NaiveDate),
    Raw(String),
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::Empty
    }
}

impl DateValue {
    pub fn from_input(text: &str) -> Self {
        if text.trim().is_empty() {
            return DateValue::Empty;
        }

        match date::parse_display(text) {
            Ok(date) => DateValue::Date(date),
            Err(e) => {
                log::warn!("Keeping unparsed date input '{}': {}", text, e);
                DateValue::Raw(text.to_owned())
            }
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, DateValue::Empty)
    }

    pub fn to_iso(&self) -> String {
        match self {
            DateValue::Empty => String::new(),
            DateValue::Date(date) => date::format_iso(date),
            DateValue::Raw(raw) => raw.clone(),
        }
    }

    pub fn input_text(&self) -> String {
        match self {
            DateValue::Empty => String::new(),
            DateValue::Date(date) => date::format_display(date),
            DateValue::Raw(raw) => raw.clone(),
        }
    }
}

pub trait ModalController {
    fn applied(&mut self, _start: &str, _end: &str) {}
    fn cleared(&mut self) {}
    fn closed(&mut self) {}
}

impl ModalController for () {}

#[derive(Default)]
struct Requests {
    date: Option<NaiveDate>,
    range: Option<(Option<NaiveDate>, Option<NaiveDate>)>,
    cursor: Option<MonthCursor>,
}

impl CalendarController for Requests {
    fn date_selected(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    fn range_selected(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.range = Some((start, end));
    }

    fn month_changed(&mut self, cursor: MonthCursor) {
        self.cursor = Some(cursor);
    }
}

pub enum CalendarLayout<'a> {
    Single(&'a Calendar),
    Dual(&'a DualCalendar),
}

#[derive(Debug, Clone)]
pub struct DatePickerModal {
    open: bool,
    period: Period,
    start: DateValue,
    end: DateValue,
    single: Calendar,
    dual: DualCalendar,
    today: NaiveDate,
}

impl DatePickerModal {
    pub fn new(today: NaiveDate) -> Self {
        let cursor = MonthCursor::from(today);
        DatePickerModal {
            open: false,
            period: Period::default(),
            start: DateValue::Empty,
            end: DateValue::Empty,
            single: Calendar::new(cursor, today).range_mode(RangeMode::Single),
            dual: DualCalendar::new(cursor, today),
            today,
        }
    }

    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.single = self.single.week_start(week_start);
        self.dual = self.dual.week_start(week_start);
        self
    }

    pub fn year_span(mut self, span: i32) -> Self {
        self.single = self.single.year_span(span);
        self.dual = self.dual.year_span(span);
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self.dual.set_right_disabled(period.years().is_some());
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected_period(&self) -> Period {
        self.period
    }

    pub fn start(&self) -> &DateValue {
        &self.start
    }

    pub fn end(&self) -> &DateValue {
        &self.end
    }

    pub fn start_input(&self) -> String {
        self.start.input_text()
    }

    pub fn end_input(&self) -> String {
        self.end.input_text()
    }

    pub fn shows_end_input(&self) -> bool {
        self.period != Period::Current
    }

    pub fn is_end_editable(&self) -> bool {
        self.period == Period::Custom
    }

    pub fn layout(&self) -> CalendarLayout<'_> {
        if self.period == Period::Current {
            CalendarLayout::Single(&self.single)
        } else {
            CalendarLayout::Dual(&self.dual)
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        match self.layout() {
            CalendarLayout::Single(cal) => cal.cursor(),
            CalendarLayout::Dual(dual) => dual.left_cursor(),
        }
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.single.set_today(today);
        self.dual.set_today(today);
    }

    pub fn open(&mut self, seed: Option<&str>) {
        self.start = DateValue::Empty;
        self.end = DateValue::Empty;

        match seed.filter(|s| !s.trim().is_empty()).map(str::parse::<DisplayValue>) {
            Some(Ok(DisplayValue::From(start))) => {
                self.period = Period::Current;
                self.start = DateValue::Date(start);
            }
            Some(Ok(DisplayValue::Range(start, end))) => {
                let derived = self.period.years().map(|n| add_years(start, n));
                if derived != Some(end) {
                    self.period = Period::Custom;
                }
                self.start = DateValue::Date(start);
                self.end = DateValue::Date(end);
            }
            Some(Ok(DisplayValue::Single(start))) => self.set_start(DateValue::Date(start)),
            Some(Err(e)) => log::warn!("Ignoring unreadable seed value: {}", e),
            None => {}
        }

        self.open = true;
        self.dual.set_right_disabled(self.period.years().is_some());
        self.move_cursor_to(self.start.date().unwrap_or(self.today));
        self.outside_click();
        self.sync_calendars();

        log::debug!(
            "Opened date picker ({}, start '{}', end '{}')",
            self.period,
            self.start.to_iso(),
            self.end.to_iso()
        );
    }

    pub fn select_period(&mut self, period: Period) {
        let cursor = self.cursor();
        self.period = period;

        match period.years() {
            Some(_) if self.start.is_set() => {
                let start = self.start.clone();
                self.set_start(start);
            }
            _ => {
                self.start = DateValue::Empty;
                self.end = DateValue::Empty;
            }
        }

        self.dual.set_right_disabled(period.years().is_some());
        self.set_cursor(cursor);
        self.outside_click();
        self.sync_calendars();

        log::debug!("Switched to period {}", period);
    }

    fn set_start(&mut self, start: DateValue) {
        self.start = start;

        if !self.start.is_set() {
            self.end = DateValue::Empty;
        } else if let Some(years) = self.period.years() {
            self.end = match self.start.date() {
                Some(start) => DateValue::Date(add_years(start, years)),
                None => DateValue::Empty,
            };
        } else if self.period == Period::Current {
            self.end = DateValue::Empty;
        }
    }

    fn order_custom_range(&mut self) {
        if let (Some(start), Some(end)) = (self.start.date(), self.end.date()) {
            if end < start {
                self.start = DateValue::Date(end);
                self.end = DateValue::Date(start);
            }
        }
    }

    pub fn type_start(&mut self, text: &str) {
        let value = DateValue::from_input(text);
        if let Some(date) = value.date() {
            self.move_cursor_to(date);
        }

        self.set_start(value);
        self.order_custom_range();
        self.sync_calendars();
    }

    pub fn type_end(&mut self, text: &str) {
        if !self.is_end_editable() {
            log::debug!("End date is not editable for period {}", self.period);
            return;
        }

        if !self.start.is_set() {
            log::debug!("Ignoring end date '{}' without a start date", text);
            return;
        }

        self.end = DateValue::from_input(text);
        self.order_custom_range();
        self.sync_calendars();
    }

    pub fn click(&mut self, side: Side, date: NaiveDate) {
        let mut requests = Requests::default();

        match self.period {
            Period::Current => {
                self.single.click(date, &mut requests);
                if let Some(date) = requests.date {
                    self.set_start(DateValue::Date(date));
                }
            }
            _ => {
                self.dual.click(side, date, &mut requests);
                if let Some((start, end)) = requests.range {
                    let start = start.map_or(DateValue::Empty, DateValue::Date);
                    if self.period.years().is_some() {
                        self.set_start(start);
                    } else {
                        self.start = start;
                        self.end = end.map_or(DateValue::Empty, DateValue::Date);
                    }
                }
            }
        }

        self.sync_calendars();
    }

    pub fn hover(&mut self, date: NaiveDate) {
        self.single.hover(date);
        self.dual.hover(date);
    }

    pub fn clear_hover(&mut self) {
        self.single.clear_hover();
        self.dual.clear_hover();
    }

    pub fn previous_month(&mut self, side: Side) {
        match self.period {
            Period::Current => self.navigate_single(|cal, req| cal.previous_month(req)),
            _ => self.dual.previous_month(side),
        }
    }

    pub fn next_month(&mut self, side: Side) {
        match self.period {
            Period::Current => self.navigate_single(|cal, req| cal.next_month(req)),
            _ => self.dual.next_month(side),
        }
    }

    pub fn choose_month(&mut self, side: Side, month: Month) {
        match self.period {
            Period::Current => self.navigate_single(|cal, req| cal.choose_month(month, req)),
            _ => self.dual.choose_month(side, month),
        }
    }

    pub fn choose_year(&mut self, side: Side, year: i32) {
        match self.period {
            Period::Current => self.navigate_single(|cal, req| cal.choose_year(year, req)),
            _ => self.dual.choose_year(side, year),
        }
    }

    pub fn toggle_dropdown(&mut self, side: Side, which: Dropdown) {
        match (self.period, which) {
            (Period::Current, Dropdown::Month) => self.single.toggle_month_dropdown(),
            (Period::Current, Dropdown::Year) => self.single.toggle_year_dropdown(),
            _ => self.dual.toggle_dropdown(side, which),
        }
    }

    pub fn outside_click(&mut self) {
        self.single.outside_click();
        self.dual.outside_click();
    }

    fn navigate_single(&mut self, nav: impl FnOnce(&mut Calendar, &mut Requests)) {
        let mut requests = Requests::default();
        nav(&mut self.single, &mut requests);
        if let Some(cursor) = requests.cursor {
            self.single.set_cursor(cursor);
        }
    }

    fn set_cursor(&mut self, cursor: MonthCursor) {
        self.single.set_cursor(cursor);
        self.dual.set_cursor(cursor);
    }

    fn move_cursor_to(&mut self, date: NaiveDate) {
        let target = MonthCursor::from(date);
        if self.period == Period::Current || self.dual.side_of(&date).is_none() {
            self.set_cursor(target);
        }
    }

    fn sync_calendars(&mut self) {
        let (start, end) = (self.start.date(), self.end.date());
        self.single.set_selection(Selection::from_bounds(start, None));
        self.dual.sync(start, end);
    }

    pub fn can_apply(&self) -> bool {
        match self.period {
            Period::Current => self.start.is_set(),
            _ => self.start.is_set() && self.end.is_set(),
        }
    }

    pub fn apply(&mut self, controller: &mut impl ModalController) -> bool {
        if !self.can_apply() {
            log::debug!("Apply requested without a complete selection");
            return false;
        }

        let (start, end) = (self.start.to_iso(), self.end.to_iso());
        log::debug!("Applying '{}' - '{}'", start, end);

        self.open = false;
        controller.applied(&start, &end);
        true
    }

    pub fn clear(&mut self, controller: &mut impl ModalController) {
        self.start = DateValue::Empty;
        self.end = DateValue::Empty;
        self.sync_calendars();
        controller.cleared();
    }

    pub fn cancel(&mut self, controller: &mut impl ModalController) {
        if !self.open {
            return;
        }
        self.open = false;
        self.outside_click();
        controller.closed();
    }

    pub fn escape(&mut self, controller: &mut impl ModalController) {
        self.cancel(controller);
    }

    pub fn backdrop_click(&mut self, controller: &mut impl ModalController) {
        self.cancel(controller);
    }
}
