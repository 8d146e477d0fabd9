use once_cell::sync::OnceCell;
use unsegen::base::style::*;

use crate::config::ThemeSpec;
use crate::picker::{DayState, VisualState};

static THEME: OnceCell<Theme> = OnceCell::new();

#[derive(Clone, Debug)]
pub struct Theme {
    pub header_style: StyleModifier,
    pub day_style: StyleModifier,
    pub today_style: StyleModifier,
    pub today_char: Option<char>,
    pub focus_style: StyleModifier,
    pub focus_char: Option<char>,
    pub selected_style: StyleModifier,
    pub range_style: StyleModifier,
    pub edge_style: StyleModifier,
    pub disabled_style: StyleModifier,
    pub active_style: StyleModifier,
    pub error_style: StyleModifier,
    pub warning_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_spec(&ThemeSpec::default())
    }
}

pub fn parse_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "default" => Color::Default,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "lightblack" | "gray" | "grey" => Color::LightBlack,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "lightwhite" => Color::LightWhite,
        _ => return None,
    };
    Some(color)
}

fn color_or(name: &str, fallback: Color) -> Color {
    parse_color(name).unwrap_or_else(|| {
        log::warn!("Unknown color '{}', falling back to {:?}", name, fallback);
        fallback
    })
}

impl Theme {
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        Theme {
            header_style: StyleModifier::new().fg_color(color_or(&spec.header_color, Color::Yellow)),
            day_style: StyleModifier::new(),
            today_style: StyleModifier::new().bold(true),
            today_char: spec.today_char,
            focus_style: StyleModifier::new()
                .fg_color(color_or(&spec.focus_color, Color::Red))
                .underline(true),
            focus_char: spec.focus_char,
            selected_style: StyleModifier::new().bg_color(color_or(&spec.selected_color, Color::Blue)),
            range_style: StyleModifier::new().bg_color(color_or(&spec.range_color, Color::Cyan)),
            edge_style: StyleModifier::new().bold(true).invert(true),
            disabled_style: StyleModifier::new()
                .fg_color(color_or(&spec.disabled_color, Color::LightBlack)),
            active_style: StyleModifier::new().invert(true),
            error_style: StyleModifier::new().fg_color(Color::Red),
            warning_style: StyleModifier::new().fg_color(Color::Yellow),
        }
    }

    pub fn day_modifiers(&self, state: &DayState, focused: bool) -> Vec<StyleModifier> {
        let mut modifiers = vec![self.day_style];

        if state.in_range {
            modifiers.push(self.range_style);
        }
        if state.selected {
            modifiers.push(self.selected_style);
        }
        if state.start || state.end {
            modifiers.push(self.edge_style);
        }
        if state.today {
            modifiers.push(self.today_style);
        }
        if focused {
            modifiers.push(self.focus_style);
        }

        modifiers
    }

    pub fn field_style(&self, state: VisualState) -> StyleModifier {
        match state {
            VisualState::Default | VisualState::Filled => self.day_style,
            VisualState::Active => self.active_style,
            VisualState::Error => self.error_style,
            VisualState::Warning => self.warning_style,
            VisualState::Disabled => self.disabled_style,
        }
    }
}

/// Registers the process-wide theme. Only the first call has an effect;
/// later calls return the theme already in place.
pub fn register(spec: &ThemeSpec) -> &'static Theme {
    THEME.get_or_init(|| {
        log::debug!("Registering theme");
        Theme::from_spec(spec)
    })
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
