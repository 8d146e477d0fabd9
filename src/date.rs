use chrono::{Datelike, Duration, Month, NaiveDate, Weekday};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::tuple,
    IResult,
};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";
pub const ISO_FORMAT: &str = "%Y-%m-%d";

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub fn all_months() -> &'static [Month] {
    &MONTHS
}

fn month_from_index0(index: u32) -> Month {
    MONTHS[(index % 12) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Sunday
    }
}

impl WeekStart {
    pub fn offset_of(&self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            WeekStart::Sunday => &["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

pub fn days_in_month(month: &Month, year: i32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1);
    let next = if month.number_from_month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1)
    };

    match (first, next) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        // Only reachable at the edges of chrono's representable range
        _ => 31,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCursor {
    month: Month,
    year: i32,
}

impl MonthCursor {
    pub fn new(month: Month, year: i32) -> Self {
        MonthCursor { month, year }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn with_month(self, month: Month) -> Self {
        MonthCursor { month, ..self }
    }

    pub fn with_year(self, year: i32) -> Self {
        MonthCursor { year, ..self }
    }

    pub fn succ(&self) -> Self {
        *self + 1
    }

    pub fn pred(&self) -> Self {
        *self - 1
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn num_days(&self) -> u32 {
        days_in_month(&self.month, self.year)
    }

    pub fn first_weekday_offset(&self, week_start: WeekStart) -> u32 {
        week_start.offset_of(self.first_day().weekday())
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month.number_from_month()
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), day)
    }

    fn total_months(&self) -> i64 {
        self.year as i64 * 12 + self.month.number_from_month() as i64 - 1
    }

    fn from_total_months(total: i64) -> Self {
        MonthCursor {
            month: month_from_index0(total.rem_euclid(12) as u32),
            year: total.div_euclid(12) as i32,
        }
    }
}

impl<T: Datelike> From<T> for MonthCursor {
    fn from(d: T) -> Self {
        MonthCursor::new(month_from_index0(d.month0()), d.year())
    }
}

impl Add<u32> for MonthCursor {
    type Output = MonthCursor;
    fn add(self, rhs: u32) -> Self::Output {
        MonthCursor::from_total_months(self.total_months() + rhs as i64)
    }
}

impl Sub<u32> for MonthCursor {
    type Output = MonthCursor;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthCursor::from_total_months(self.total_months() - rhs as i64)
    }
}

impl PartialOrd for MonthCursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthCursor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_months().cmp(&other.total_months())
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

/// A day that does not exist in the target year (Feb 29) rolls over into
/// the following month, so 2024-02-29 + 1 year is 2025-03-01.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    if let Some(shifted) = NaiveDate::from_ymd_opt(year, date.month(), date.day()) {
        return shifted;
    }

    match NaiveDate::from_ymd_opt(year, date.month(), 1) {
        Some(first) => first + Duration::days(date.day() as i64 - 1),
        None => date,
    }
}

pub fn format_display(date: &NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

pub fn format_iso(date: &NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

fn number<'a>(min: usize, max: usize) -> impl FnMut(&'a str) -> IResult<&'a str, u32> {
    map_res(take_while_m_n(min, max, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })
}

fn display_date(input: &str) -> IResult<&str, (u32, u32, u32)> {
    let (rest, (day, _, month, _, year)) = tuple((
        number(1, 2),
        char('/'),
        number(1, 2),
        char('/'),
        number(4, 4),
    ))(input)?;

    Ok((rest, (day, month, year)))
}

pub fn parse_display(text: &str) -> Result<NaiveDate> {
    let (_, (day, month, year)) = all_consuming(display_date)(text.trim())?;

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
        Error::new(
            ErrorKind::DateParse,
            &format!("'{}' is not a calendar day", text.trim()),
        )
    })
}

pub fn parse_iso(text: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(text.trim(), ISO_FORMAT)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayValue {
    Single(NaiveDate),
    Range(NaiveDate, NaiveDate),
    From(NaiveDate),
}

impl DisplayValue {
    pub fn start(&self) -> NaiveDate {
        match self {
            DisplayValue::Single(start)
            | DisplayValue::Range(start, _)
            | DisplayValue::From(start) => *start,
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match self {
            DisplayValue::Range(_, end) => Some(*end),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Single(date) => write!(f, "{}", format_display(date)),
            DisplayValue::Range(start, end) => {
                write!(f, "{} to {}", format_display(start), format_display(end))
            }
            DisplayValue::From(date) => write!(f, "From {}", format_display(date)),
        }
    }
}

impl FromStr for DisplayValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(start) = s.strip_prefix("From ") {
            Ok(DisplayValue::From(parse_display(start)?))
        } else if let Some((start, end)) = s.split_once(" to ") {
            Ok(DisplayValue::Range(parse_display(start)?, parse_display(end)?))
        } else {
            Ok(DisplayValue::Single(parse_display(s)?))
        }
    }
}
