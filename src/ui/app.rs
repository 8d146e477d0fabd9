use crate::config::{Config, KeyMap};
use crate::events::{Dispatcher, Event};
use crate::picker::DatePicker;

use super::context::{Context, Mode, Outcome};
use super::{ModalWindow, Theme};

use chrono::Local;
use unsegen::base::Terminal;
use unsegen::input::{Behavior, EditBehavior, Input, Key};
use unsegen::widget::*;

pub struct App<'a> {
    config: &'a Config,
    theme: &'a Theme,
    context: Context,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, theme: &'a Theme, picker: DatePicker) -> App<'a> {
        let context = Context::new(picker, Local::now());
        App {
            config,
            theme,
            context,
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<Outcome, Box<dyn std::error::Error>> {
        loop {
            let mut outcome = None;

            match dispatcher.next()? {
                Event::Update => self.context.update(),
                Event::Resize => term.on_sig_winch(),
                Event::Input(input) => match self.context.mode {
                    Mode::Normal => {
                        if input.matches(Key::Esc) {
                            outcome = self.context.execute(crate::cmds::Cmd::Cancel);
                        } else {
                            input
                                .chain(KeyMapBehavior {
                                    context: &mut self.context,
                                    key_map: &self.config.key_map,
                                    outcome: &mut outcome,
                                })
                                .finish();
                        }
                    }
                    Mode::Insert(field) => {
                        input
                            .chain(FieldEditor(&mut self.context))
                            .chain(
                                EditBehavior::new(self.context.input_sink_mut(field))
                                    .delete_forwards_on(Key::Delete)
                                    .delete_backwards_on(Key::Backspace)
                                    .left_on(Key::Left)
                                    .right_on(Key::Right),
                            )
                            .finish();
                    }
                },
            }

            if let Some(outcome) = outcome {
                log::info!("Picker session finished: {:?}", outcome);
                return Ok(outcome);
            }

            let root = term.create_root_window();
            ModalWindow::new(&self.context, self.theme)
                .as_widget()
                .draw(root, RenderingHints::new());
            term.present();
        }
    }
}

struct KeyMapBehavior<'a> {
    context: &'a mut Context,
    key_map: &'a KeyMap,
    outcome: &'a mut Option<Outcome>,
}

impl Behavior for KeyMapBehavior<'_> {
    fn input(self, input: Input) -> Option<Input> {
        if let unsegen::input::Event::Key(key) = input.event {
            if let Some(cmd) = self.key_map.get(&key) {
                log::trace!("{:?} -> {:?}", key, cmd);
                *self.outcome = self.context.execute(*cmd);
                return None;
            }
        }
        Some(input)
    }
}

struct FieldEditor<'a>(&'a mut Context);

impl Behavior for FieldEditor<'_> {
    fn input(self, input: Input) -> Option<Input> {
        match input.event {
            unsegen::input::Event::Key(Key::Char('\n')) => {
                self.0.commit_edit();
                None
            }
            unsegen::input::Event::Key(Key::Esc) => {
                self.0.abort_edit();
                None
            }
            _ => Some(input),
        }
    }
}
