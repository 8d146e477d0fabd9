use serde::Deserialize;
use unsegen::input::Key;

use crate::picker::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cmd {
    Noop,
    NextDay,
    PrevDay,
    NextWeek,
    PrevWeek,
    NextMonth,
    PrevMonth,
    MonthMenu,
    YearMenu,
    Pick,
    EditStart,
    EditEnd,
    Preset(Period),
    Apply,
    Clear,
    Cancel,
}

pub fn parse_key(name: &str) -> Option<Key> {
    match name {
        "enter" | "return" => Some(Key::Char('\n')),
        "tab" => Some(Key::Char('\t')),
        "space" => Some(Key::Char(' ')),
        "backtab" => Some(Key::BackTab),
        "esc" | "escape" => Some(Key::Esc),
        "left" => Some(Key::Left),
        "right" => Some(Key::Right),
        "up" => Some(Key::Up),
        "down" => Some(Key::Down),
        "pageup" => Some(Key::PageUp),
        "pagedown" => Some(Key::PageDown),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        }
    }
}
