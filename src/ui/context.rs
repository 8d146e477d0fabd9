use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use std::cmp::min;

use unsegen::widget::builtin::LineEdit;

use crate::cmds::Cmd;
use crate::date::MonthCursor;
use crate::picker::{
    CalendarLayout, ChangeEvent, DatePicker, DatePickerModal, Dropdown, PickerHost, Side,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert(Field),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied {
        display: String,
        start: String,
        end: String,
    },
    Cancelled,
}

#[derive(Default)]
struct Relay {
    display: Option<String>,
    range: Option<(String, String)>,
}

impl PickerHost for Relay {
    fn changed(&mut self, event: ChangeEvent) {
        self.display = Some(event.target.value);
    }

    fn date_range_changed(&mut self, start: &str, end: &str) {
        self.range = Some((start.to_owned(), end.to_owned()));
    }
}

pub struct Context {
    pub mode: Mode,
    picker: DatePicker,
    focus: NaiveDate,
    menu_index: usize,
    start_line: LineEdit,
    end_line: LineEdit,
    now: DateTime<Local>,
    pub last_error_message: Option<String>,
}

impl Context {
    pub fn new(picker: DatePicker, now: DateTime<Local>) -> Self {
        let mut context = Context {
            mode: Mode::Normal,
            picker,
            focus: now.date_naive(),
            menu_index: 0,
            start_line: LineEdit::new(),
            end_line: LineEdit::new(),
            now,
            last_error_message: None,
        };

        context.picker.focus();
        context.after_change();
        context
    }

    pub fn picker(&self) -> &DatePicker {
        &self.picker
    }

    pub fn modal(&self) -> &DatePickerModal {
        self.picker.modal()
    }

    pub fn now(&self) -> &DateTime<Local> {
        &self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn focus(&self) -> NaiveDate {
        self.focus
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn input_sink(&self, field: Field) -> &LineEdit {
        match field {
            Field::Start => &self.start_line,
            Field::End => &self.end_line,
        }
    }

    pub fn input_sink_mut(&mut self, field: Field) -> &mut LineEdit {
        match field {
            Field::Start => &mut self.start_line,
            Field::End => &mut self.end_line,
        }
    }

    pub fn update(&mut self) {
        self.now = Local::now();
        let today = self.today();
        self.picker.modal_mut().set_today(today);
    }

    fn focus_side(&self) -> Side {
        match self.modal().layout() {
            CalendarLayout::Single(_) => Side::Left,
            CalendarLayout::Dual(dual) => dual.side_of(&self.focus).unwrap_or(Side::Left),
        }
    }

    fn is_visible(&self, date: &NaiveDate) -> bool {
        match self.modal().layout() {
            CalendarLayout::Single(cal) => cal.cursor().contains(date),
            CalendarLayout::Dual(dual) => dual.side_of(date).is_some(),
        }
    }

    fn menu_side(&self) -> Side {
        match self.modal().layout() {
            CalendarLayout::Dual(dual) if dual.is_right_disabled() => Side::Left,
            _ => self.focus_side(),
        }
    }

    fn open_dropdown(&self) -> Option<(Side, Dropdown)> {
        match self.modal().layout() {
            CalendarLayout::Single(cal) => cal.dropdown().map(|d| (Side::Left, d)),
            CalendarLayout::Dual(dual) => [Side::Left, Side::Right]
                .iter()
                .find_map(|side| dual.calendar(*side).dropdown().map(|d| (*side, d))),
        }
    }

    pub fn menu_for(&self, side: Side) -> Option<usize> {
        match self.open_dropdown() {
            Some((open_side, _)) if open_side == side => Some(self.menu_index),
            _ => None,
        }
    }

    fn after_change(&mut self) {
        if !self.is_visible(&self.focus) {
            let cursor = self.modal().cursor();
            let day = min(self.focus.day(), cursor.num_days());
            self.focus = cursor.day(day).unwrap_or_else(|| cursor.first_day());
        }
        let focus = self.focus;
        self.picker.modal_mut().hover(focus);

        if self.mode == Mode::Normal {
            let (start, end) = (self.modal().start_input(), self.modal().end_input());
            self.start_line.set(&start);
            self.end_line.set(&end);
        }
    }

    fn move_focus(&mut self, days: i64) {
        let target = self.focus + Duration::days(days);
        let side = self.focus_side();

        if !self.is_visible(&target) {
            let modal = self.picker.modal_mut();
            if target > self.focus {
                modal.next_month(side);
            } else {
                modal.previous_month(side);
            }
        }

        self.focus = target;
        self.after_change();
    }

    fn navigate_month(&mut self, forward: bool) {
        let side = self.focus_side();
        let modal = self.picker.modal_mut();
        if forward {
            modal.next_month(side);
        } else {
            modal.previous_month(side);
        }

        let cursor = self.modal().cursor();
        let shifted = if forward {
            MonthCursor::from(self.focus) + 1
        } else {
            MonthCursor::from(self.focus) - 1
        };
        let day = min(self.focus.day(), shifted.num_days());
        self.focus = shifted.day(day).unwrap_or_else(|| cursor.first_day());
        self.after_change();
    }

    fn toggle_menu(&mut self, which: Dropdown) {
        let side = self.menu_side();
        let cursor = match self.modal().layout() {
            CalendarLayout::Single(cal) => cal.cursor(),
            CalendarLayout::Dual(dual) => dual.calendar(side).cursor(),
        };

        self.menu_index = match which {
            Dropdown::Month => cursor.month().number_from_month() as usize - 1,
            Dropdown::Year => {
                let years = match self.modal().layout() {
                    CalendarLayout::Single(cal) => cal.year_options(),
                    CalendarLayout::Dual(dual) => dual.calendar(side).year_options(),
                };
                years
                    .iter()
                    .position(|y| *y == cursor.year())
                    .unwrap_or(years.len() / 2)
            }
        };

        self.picker.modal_mut().toggle_dropdown(side, which);
    }

    fn menu_len(&self, which: Dropdown, side: Side) -> usize {
        match which {
            Dropdown::Month => 12,
            Dropdown::Year => match self.modal().layout() {
                CalendarLayout::Single(cal) => cal.year_options().len(),
                CalendarLayout::Dual(dual) => dual.calendar(side).year_options().len(),
            },
        }
    }

    fn choose_from_menu(&mut self, side: Side, which: Dropdown) {
        let focus_day = self.focus.day();
        match which {
            Dropdown::Month => {
                let month = crate::date::all_months()[self.menu_index % 12];
                self.picker.modal_mut().choose_month(side, month);
            }
            Dropdown::Year => {
                let years = match self.modal().layout() {
                    CalendarLayout::Single(cal) => cal.year_options(),
                    CalendarLayout::Dual(dual) => dual.calendar(side).year_options(),
                };
                if let Some(year) = years.get(self.menu_index) {
                    self.picker.modal_mut().choose_year(side, *year);
                }
            }
        }

        let cursor = match self.modal().layout() {
            CalendarLayout::Single(cal) => cal.cursor(),
            CalendarLayout::Dual(dual) => dual.calendar(side).cursor(),
        };
        self.focus = cursor
            .day(min(focus_day, cursor.num_days()))
            .unwrap_or_else(|| cursor.first_day());
        self.after_change();
    }

    fn menu_cmd(&mut self, side: Side, which: Dropdown, cmd: Cmd) -> bool {
        let len = self.menu_len(which, side);
        let step: i64 = match cmd {
            Cmd::NextDay => 1,
            Cmd::PrevDay => -1,
            Cmd::NextWeek => 3,
            Cmd::PrevWeek => -3,
            Cmd::Pick => {
                self.choose_from_menu(side, which);
                return true;
            }
            Cmd::Cancel => {
                self.picker.modal_mut().outside_click();
                return true;
            }
            Cmd::MonthMenu | Cmd::YearMenu => return false,
            _ => {
                self.picker.modal_mut().outside_click();
                return false;
            }
        };

        let next = self.menu_index as i64 + step;
        if next >= 0 && (next as usize) < len {
            self.menu_index = next as usize;
        }
        true
    }

    pub fn begin_edit(&mut self, field: Field) {
        if field == Field::End && !self.modal().is_end_editable() {
            self.last_error_message = Some(match self.modal().shows_end_input() {
                true => "End date is derived from the preset".to_owned(),
                false => "This preset has no end date".to_owned(),
            });
            return;
        }

        self.picker.modal_mut().outside_click();
        self.mode = Mode::Insert(field);
    }

    pub fn commit_edit(&mut self) {
        if let Mode::Insert(field) = self.mode {
            let text = self.input_sink(field).get().to_owned();
            let modal = self.picker.modal_mut();
            match field {
                Field::Start => modal.type_start(&text),
                Field::End => modal.type_end(&text),
            }

            self.mode = Mode::Normal;
            if let Some(start) = self.modal().start().date() {
                if field == Field::Start {
                    self.focus = start;
                }
            }
            self.after_change();
        }
    }

    pub fn abort_edit(&mut self) {
        self.mode = Mode::Normal;
        self.after_change();
    }

    pub fn execute(&mut self, cmd: Cmd) -> Option<Outcome> {
        self.last_error_message = None;

        if let Some((side, which)) = self.open_dropdown() {
            if self.menu_cmd(side, which, cmd) {
                return None;
            }
        }

        match cmd {
            Cmd::Noop => {}
            Cmd::NextDay => self.move_focus(1),
            Cmd::PrevDay => self.move_focus(-1),
            Cmd::NextWeek => self.move_focus(7),
            Cmd::PrevWeek => self.move_focus(-7),
            Cmd::NextMonth => self.navigate_month(true),
            Cmd::PrevMonth => self.navigate_month(false),
            Cmd::MonthMenu => self.toggle_menu(Dropdown::Month),
            Cmd::YearMenu => self.toggle_menu(Dropdown::Year),
            Cmd::Pick => {
                let side = self.focus_side();
                if let CalendarLayout::Dual(dual) = self.modal().layout() {
                    if side == Side::Right && dual.is_right_disabled() {
                        self.last_error_message =
                            Some("Pick the start date in the left calendar".to_owned());
                        return None;
                    }
                }
                let focus = self.focus;
                self.picker.modal_mut().click(side, focus);
                self.after_change();
            }
            Cmd::EditStart => self.begin_edit(Field::Start),
            Cmd::EditEnd => self.begin_edit(Field::End),
            Cmd::Preset(period) => {
                self.picker.modal_mut().select_period(period);
                self.after_change();
            }
            Cmd::Apply => {
                let mut relay = Relay::default();
                if self.picker.apply(&mut relay) {
                    let (start, end) = relay.range.unwrap_or_default();
                    return Some(Outcome::Applied {
                        display: relay.display.unwrap_or_default(),
                        start,
                        end,
                    });
                }
                self.last_error_message = Some("Select a complete range first".to_owned());
            }
            Cmd::Clear => {
                self.picker.modal_mut().clear(&mut ());
                self.after_change();
            }
            Cmd::Cancel => {
                self.picker.cancel();
                return Some(Outcome::Cancelled);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::format_display;
    use crate::picker::Period;
    use chrono::TimeZone;

    fn context() -> Context {
        let now = Local.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let modal = DatePickerModal::new(now.date_naive());
        Context::new(DatePicker::new(modal), now)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn starts_open_on_today() {
        let ctx = context();
        assert!(ctx.picker().is_open());
        assert_eq!(ctx.focus(), ymd(2025, 1, 15));
    }

    #[test]
    fn pick_two_days_and_apply() {
        let mut ctx = context();

        ctx.execute(Cmd::PrevWeek);
        ctx.execute(Cmd::PrevDay);
        assert_eq!(ctx.focus(), ymd(2025, 1, 7));
        ctx.execute(Cmd::Pick);
        ctx.execute(Cmd::NextDay);
        ctx.execute(Cmd::NextDay);
        ctx.execute(Cmd::Pick);

        assert_eq!(
            ctx.execute(Cmd::Apply),
            Some(Outcome::Applied {
                display: "07/01/2025 to 09/01/2025".to_owned(),
                start: "2025-01-07".to_owned(),
                end: "2025-01-09".to_owned(),
            })
        );
    }

    #[test]
    fn focus_scrolls_months() {
        let mut ctx = context();
        for _ in 0..8 {
            ctx.execute(Cmd::NextWeek);
        }
        // 15/01 + 56 days
        assert_eq!(ctx.focus(), ymd(2025, 3, 12));
        assert!(ctx.modal().cursor() <= MonthCursor::new(chrono::Month::March, 2025));
        assert!(ctx.modal().cursor() + 1 >= MonthCursor::new(chrono::Month::March, 2025));
    }

    #[test]
    fn typed_start_in_year_preset() {
        let mut ctx = context();
        ctx.execute(Cmd::Preset(Period::OneYear));
        ctx.execute(Cmd::EditStart);
        assert_eq!(ctx.mode, Mode::Insert(Field::Start));

        ctx.input_sink_mut(Field::Start).set("01/03/2024");
        ctx.commit_edit();

        assert_eq!(ctx.mode, Mode::Normal);
        assert_eq!(ctx.input_sink(Field::End).get(), "01/03/2025");
        assert_eq!(ctx.focus(), ymd(2024, 3, 1));

        ctx.execute(Cmd::EditEnd);
        assert_eq!(ctx.mode, Mode::Normal);
        assert!(ctx.last_error_message.is_some());
    }

    #[test]
    fn month_menu_jumps() {
        let mut ctx = context();
        ctx.execute(Cmd::MonthMenu);
        assert_eq!(ctx.menu_index(), 0);
        assert_eq!(ctx.menu_for(Side::Left), Some(0));

        ctx.execute(Cmd::NextWeek);
        ctx.execute(Cmd::NextDay);
        ctx.execute(Cmd::Pick);

        assert_eq!(ctx.menu_for(Side::Left), None);
        assert_eq!(
            ctx.modal().cursor(),
            MonthCursor::new(chrono::Month::May, 2025)
        );
        assert_eq!(ctx.focus(), ymd(2025, 5, 15));
    }

    #[test]
    fn pick_on_disabled_grid_reports() {
        let mut ctx = context();
        ctx.execute(Cmd::Preset(Period::TwoYears));
        for _ in 0..3 {
            ctx.execute(Cmd::NextWeek);
        }
        assert_eq!(ctx.focus(), ymd(2025, 2, 5));

        ctx.execute(Cmd::Pick);
        assert!(ctx.last_error_message.is_some());
        assert!(!ctx.modal().start().is_set());

        ctx.execute(Cmd::PrevWeek);
        ctx.execute(Cmd::Pick);
        assert!(ctx.last_error_message.is_none());
        assert_eq!(ctx.modal().start().date(), Some(ymd(2025, 1, 29)));
        assert_eq!(ctx.modal().end().date(), Some(ymd(2027, 1, 29)));
    }

    #[test]
    fn cancel_ends_session() {
        let mut ctx = context();
        assert_eq!(ctx.execute(Cmd::Cancel), Some(Outcome::Cancelled));
        assert!(!ctx.picker().is_open());
    }

    #[test]
    fn apply_needs_selection() {
        let mut ctx = context();
        assert_eq!(ctx.execute(Cmd::Apply), None);
        assert!(ctx.last_error_message.is_some());
    }

    #[test]
    fn current_preset_outcome() {
        let mut ctx = context();
        ctx.execute(Cmd::Preset(Period::Current));
        ctx.execute(Cmd::Pick);

        match ctx.execute(Cmd::Apply) {
            Some(Outcome::Applied { display, start, end }) => {
                assert_eq!(display, format!("From {}", format_display(&ymd(2025, 1, 15))));
                assert_eq!(start, "2025-01-15");
                assert!(end.is_empty());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
