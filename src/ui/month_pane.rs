use chrono::{Datelike, NaiveDate};
use std::cmp::min;
use std::fmt::Display;
use std::ops::Range;
use unsegen::base::*;
use unsegen::widget::*;

use super::Theme;
use crate::picker::{Calendar, Dropdown};

pub struct DayCell<'a> {
    day_num: u8,
    focused: bool,
    is_today: bool,
    theme: &'a Theme,
}

impl<'a> DayCell<'a> {
    pub const CELL_WIDTH: usize = 4;

    fn new(day_num: u8, theme: &'a Theme) -> Self {
        DayCell {
            day_num,
            focused: false,
            is_today: false,
            theme,
        }
    }

    fn focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arg_today = if self.is_today {
            self.theme.today_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_focus = if self.focused {
            self.theme.focus_char.unwrap_or(' ')
        } else {
            ' '
        };

        write!(f, "{}{}{:>2}", arg_today, arg_focus, self.day_num)
    }
}

// Rows of a quick-jump list that fit into `height`, scrolled so that
// `selected` stays in view.
fn menu_rows(num_rows: usize, selected: Option<usize>, height: usize) -> Range<usize> {
    let first = selected.map_or(0, |row| (row + 1).saturating_sub(height));
    let first = min(first, num_rows.saturating_sub(height));
    first..min(num_rows, first + height)
}

pub struct MonthPane<'a> {
    calendar: &'a Calendar,
    focus: Option<NaiveDate>,
    menu_index: Option<usize>,
    theme: &'a Theme,
}

impl<'a> MonthPane<'a> {
    const COLUMNS: usize = 7;
    const ROWS: usize = 6;
    const TITLE_ROWS: usize = 1;
    const HEADER_ROWS: usize = 1;
    const MENU_COLUMNS: usize = 3;

    pub fn new(calendar: &'a Calendar, theme: &'a Theme) -> Self {
        MonthPane {
            calendar,
            focus: None,
            menu_index: None,
            theme,
        }
    }

    pub fn focus(mut self, date: Option<NaiveDate>) -> Self {
        self.focus = date;
        self
    }

    pub fn menu_index(mut self, index: Option<usize>) -> Self {
        self.menu_index = index;
        self
    }

    fn width() -> usize {
        Self::COLUMNS * DayCell::CELL_WIDTH
    }

    fn draw_title(&self, cursor: &mut Cursor) {
        let style = if self.calendar.is_disabled() {
            self.theme.disabled_style
        } else {
            self.theme.header_style
        };
        cursor.set_style_modifier(style);

        let marker = match self.calendar.dropdown() {
            Some(Dropdown::Month) => "(month)",
            Some(Dropdown::Year) => "(year)",
            None => "",
        };
        let title = format!("{} {}", self.calendar.cursor(), marker);
        cursor.write(&format!("<{:^width$}>", title.trim_end(), width = Self::width() - 2));
        cursor.wrap_line();
    }

    fn draw_grid(&self, cursor: &mut Cursor) {
        let theme = self.theme;

        cursor.set_style_modifier(theme.header_style);
        for &head in self.calendar.get_week_start().header() {
            cursor.write(&format!("{:>width$}", head, width = DayCell::CELL_WIDTH));
        }
        cursor.wrap_line();

        cursor.set_style_modifier(if self.calendar.is_disabled() {
            theme.disabled_style
        } else {
            theme.day_style
        });

        let grid = self.calendar.grid();
        for row in grid.rows() {
            for cell in row {
                match cell {
                    None => cursor.write(&" ".repeat(DayCell::CELL_WIDTH)),
                    Some(date) => {
                        let state = self.calendar.classify(date);
                        let focused = self.focus == Some(*date);
                        let saved_style = cursor.get_style_modifier();

                        for modifier in theme.day_modifiers(&state, focused) {
                            cursor.apply_style_modifier(modifier);
                        }

                        let cell = DayCell::new(date.day() as u8, theme)
                            .focus(focused)
                            .today(state.today);
                        cursor.write(&cell.to_string());
                        cursor.set_style_modifier(saved_style);
                    }
                }
            }
            cursor.wrap_line();
        }
    }

    fn draw_menu(&self, which: Dropdown, cursor: &mut Cursor) {
        let entries: Vec<String> = match which {
            Dropdown::Month => self
                .calendar
                .month_options()
                .iter()
                .map(|m| m.name().to_owned())
                .collect(),
            Dropdown::Year => self
                .calendar
                .year_options()
                .iter()
                .map(|y| y.to_string())
                .collect(),
        };

        let col_width = Self::width() / Self::MENU_COLUMNS;
        let num_rows = (entries.len() + Self::MENU_COLUMNS - 1) / Self::MENU_COLUMNS;
        let visible = menu_rows(
            num_rows,
            self.menu_index.map(|i| i / Self::MENU_COLUMNS),
            Self::HEADER_ROWS + Self::ROWS,
        );

        for (row_idx, row) in entries
            .chunks(Self::MENU_COLUMNS)
            .enumerate()
            .skip(visible.start)
            .take(visible.len())
        {
            for (col_idx, entry) in row.iter().enumerate() {
                let idx = row_idx * Self::MENU_COLUMNS + col_idx;
                let saved_style = cursor.get_style_modifier();
                if self.menu_index == Some(idx) {
                    cursor.apply_style_modifier(self.theme.active_style);
                }
                cursor.write(&format!("{:<width$}", entry, width = col_width));
                cursor.set_style_modifier(saved_style);
            }
            cursor.wrap_line();
        }
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(Self::width() + 1),
            height: RowDemand::exact(Self::TITLE_ROWS + Self::HEADER_ROWS + Self::ROWS),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window);

        self.draw_title(&mut cursor);

        match self.calendar.dropdown() {
            Some(which) => self.draw_menu(which, &mut cursor),
            None => self.draw_grid(&mut cursor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_menus_are_not_scrolled() {
        assert_eq!(menu_rows(4, Some(3), 7), 0..4);
        assert_eq!(menu_rows(7, None, 7), 0..7);
    }

    #[test]
    fn long_menus_follow_the_selection() {
        // year_span 15 gives 31 years, 11 rows of three
        assert_eq!(menu_rows(11, Some(0), 7), 0..7);
        assert_eq!(menu_rows(11, Some(6), 7), 0..7);
        assert_eq!(menu_rows(11, Some(7), 7), 1..8);
        assert_eq!(menu_rows(11, Some(10), 7), 4..11);
        assert_eq!(menu_rows(11, Some(40), 7), 4..11);
    }
}
