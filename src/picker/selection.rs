use chrono::NaiveDate;
use std::cmp::{max, min};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    NoSelection,
    RangeInProgress(NaiveDate),
    RangeComplete(NaiveDate, NaiveDate),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::NoSelection
    }
}

impl Selection {
    pub fn range(a: NaiveDate, b: NaiveDate) -> Self {
        Selection::RangeComplete(min(a, b), max(a, b))
    }

    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => Selection::range(start, end),
            (Some(start), None) => Selection::RangeInProgress(start),
            (None, _) => Selection::NoSelection,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        match self {
            Selection::NoSelection => None,
            Selection::RangeInProgress(start) | Selection::RangeComplete(start, _) => Some(*start),
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match self {
            Selection::RangeComplete(_, end) => Some(*end),
            _ => None,
        }
    }

    pub fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.start(), self.end())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::NoSelection)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, Selection::RangeInProgress(_))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Selection::RangeComplete(..))
    }

    pub fn pick(self, date: NaiveDate) -> Self {
        match self {
            Selection::NoSelection | Selection::RangeComplete(..) => {
                Selection::RangeInProgress(date)
            }
            Selection::RangeInProgress(start) => Selection::range(start, date),
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        match self {
            Selection::NoSelection => false,
            Selection::RangeInProgress(start) => start == date,
            Selection::RangeComplete(start, end) => start <= date && date <= end,
        }
    }

    pub fn preview(&self, hover: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
        match (self, hover) {
            (Selection::RangeInProgress(start), Some(hover)) => {
                Some((min(*start, hover), max(*start, hover)))
            }
            _ => None,
        }
    }
}
