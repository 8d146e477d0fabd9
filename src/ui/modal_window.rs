use unsegen::base::*;
use unsegen::widget::*;

use super::context::{Context, Field, Mode};
use super::{MonthPane, Theme};
use crate::picker::{CalendarLayout, Period, Side};

pub struct Label {
    text: String,
    style: StyleModifier,
}

impl Label {
    pub fn new(text: impl Into<String>, style: StyleModifier) -> Self {
        Label {
            text: text.into(),
            style,
        }
    }
}

impl Widget for Label {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(self.text.chars().count()),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window);
        cursor.set_style_modifier(self.style);
        cursor.write(&self.text);
    }
}

pub struct ModalWindow<'a> {
    context: &'a Context,
    theme: &'a Theme,
}

impl<'a> ModalWindow<'a> {
    const INPUT_WIDTH: usize = 12;

    pub fn new(context: &'a Context, theme: &'a Theme) -> Self {
        ModalWindow { context, theme }
    }

    fn field_line(&self) -> impl Widget + 'a {
        let picker = self.context.picker();
        let (text, style) = if picker.value().is_empty() {
            (picker.placeholder_text(), self.theme.disabled_style)
        } else {
            (picker.value(), self.theme.field_style(picker.visual_state()))
        };

        HLayout::new()
            .widget(Label::new("Date: ", self.theme.header_style))
            .widget(Label::new(format!("[{}]", text), style))
    }

    fn preset_bar(&self) -> impl Widget + 'a {
        let selected = self.context.modal().selected_period();
        let mut layout = HLayout::new();

        for (num, period) in Period::ALL.iter().enumerate() {
            let style = if *period == selected {
                self.theme.active_style
            } else {
                self.theme.day_style
            };
            layout = layout
                .widget(Label::new(format!("{} ", num + 1), self.theme.header_style))
                .widget(Label::new(period.label(), style))
                .widget(Label::new("  ", self.theme.day_style));
        }

        layout
    }

    fn input_box(&self, field: Field, text: String, enabled: bool) -> Label {
        let style = if enabled {
            self.theme.day_style
        } else {
            self.theme.disabled_style
        };
        Label::new(
            format!("[{:<width$}]", text, width = Self::INPUT_WIDTH - 2),
            if self.context.mode == Mode::Insert(field) {
                self.theme.active_style
            } else {
                style
            },
        )
    }

    fn inputs_line(&self) -> impl Widget + 'a {
        let modal = self.context.modal();
        let mut layout = HLayout::new().widget(Label::new("Start ", self.theme.header_style));

        layout = match self.context.mode {
            Mode::Insert(Field::Start) => {
                layout.widget(self.context.input_sink(Field::Start).as_widget())
            }
            _ => layout.widget(self.input_box(Field::Start, modal.start_input(), true)),
        };

        if modal.shows_end_input() {
            layout = layout.widget(Label::new("  End ", self.theme.header_style));
            layout = match self.context.mode {
                Mode::Insert(Field::End) => {
                    layout.widget(self.context.input_sink(Field::End).as_widget())
                }
                _ => layout.widget(self.input_box(
                    Field::End,
                    modal.end_input(),
                    modal.is_end_editable(),
                )),
            };
        }

        layout
    }

    fn calendars(&self) -> impl Widget + 'a {
        let focus = Some(self.context.focus());
        let theme = self.theme;

        match self.context.modal().layout() {
            CalendarLayout::Single(cal) => HLayout::new().widget(
                MonthPane::new(cal, theme)
                    .focus(focus)
                    .menu_index(self.context.menu_for(Side::Left)),
            ),
            CalendarLayout::Dual(dual) => HLayout::new()
                .widget(
                    MonthPane::new(dual.calendar(Side::Left), theme)
                        .focus(focus)
                        .menu_index(self.context.menu_for(Side::Left)),
                )
                .widget(Label::new("  ", theme.day_style))
                .widget(
                    MonthPane::new(dual.calendar(Side::Right), theme)
                        .focus(focus)
                        .menu_index(self.context.menu_for(Side::Right)),
                ),
        }
    }

    fn action_bar(&self) -> impl Widget + 'a {
        let apply_style = if self.context.modal().can_apply() {
            self.theme.active_style
        } else {
            self.theme.disabled_style
        };

        HLayout::new()
            .widget(Label::new(" Apply ", apply_style))
            .widget(Label::new("  ", self.theme.day_style))
            .widget(Label::new("Clear", self.theme.day_style))
            .widget(Label::new("  ", self.theme.day_style))
            .widget(Label::new("Cancel", self.theme.day_style))
    }

    fn status_line(&self) -> Label {
        match (&self.context.last_error_message, self.context.mode) {
            (Some(msg), _) => Label::new(msg.as_str(), self.theme.error_style),
            (None, Mode::Insert(_)) => Label::new(
                "DD/MM/YYYY  enter: confirm  esc: discard",
                self.theme.disabled_style,
            ),
            (None, Mode::Normal) => Label::new(
                format!("{}", self.context.now().format("%d/%m/%Y %H:%M")),
                self.theme.disabled_style,
            ),
        }
    }

    pub fn as_widget(&self) -> impl Widget + 'a {
        let layout = VLayout::new().widget(self.field_line());

        if !self.context.picker().is_open() {
            return layout;
        }

        layout
            .widget(Label::new("", self.theme.day_style))
            .widget(self.preset_bar())
            .widget(self.inputs_line())
            .widget(self.calendars())
            .widget(self.action_bar())
            .widget(self.status_line())
    }
}
