pub mod app;
pub mod context;
pub mod modal_window;
pub mod month_pane;
pub mod theme;

pub use context::{Context, Field, Mode, Outcome};
pub use modal_window::{Label, ModalWindow};
pub use month_pane::{DayCell, MonthPane};
pub use theme::Theme;
