pub mod cmds;
pub mod config;
pub mod date;
pub mod error;
pub mod events;
pub mod picker;
pub mod ui;
