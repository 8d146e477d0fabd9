use super::modal::{DatePickerModal, ModalController, Period};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Default,
    Active,
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Normal,
    Error,
    Warning,
    Disabled,
}

impl Default for Status {
    fn default() -> Self {
        Status::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Default,
    Active,
    Filled,
    Error,
    Warning,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTarget {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub target: ChangeTarget,
}

impl ChangeEvent {
    pub fn new(value: String) -> Self {
        ChangeEvent {
            target: ChangeTarget { value },
        }
    }
}

pub trait PickerHost {
    fn changed(&mut self, _event: ChangeEvent) {}
    fn calendar_clicked(&mut self) {}
    fn date_range_changed(&mut self, _start: &str, _end: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Controlled(String),
    Uncontrolled(String),
}

#[derive(Default)]
struct Applied(Option<(String, String)>);

impl ModalController for Applied {
    fn applied(&mut self, start: &str, end: &str) {
        self.0 = Some((start.to_owned(), end.to_owned()));
    }
}

pub fn display_text(start: &str, end: &str, period: Period) -> String {
    let start = super::iso_to_display(start);
    if end.is_empty() {
        if period == Period::Current {
            format!("From {}", start)
        } else {
            start
        }
    } else {
        format!("{} to {}", start, super::iso_to_display(end))
    }
}

#[derive(Debug, Clone)]
pub struct DatePicker {
    value: Value,
    state: FieldState,
    status: Status,
    placeholder: String,
    modal: DatePickerModal,
}

impl DatePicker {
    pub fn new(modal: DatePickerModal) -> Self {
        DatePicker {
            value: Value::Uncontrolled(String::new()),
            state: FieldState::Default,
            status: Status::Normal,
            placeholder: "DD/MM/YYYY".to_owned(),
            modal,
        }
    }

    pub fn controlled(mut self, value: &str) -> Self {
        self.value = Value::Controlled(value.to_owned());
        self.state = Self::resting_state(value);
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.value = Value::Uncontrolled(value.to_owned());
        self.state = Self::resting_state(value);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_owned();
        self
    }

    fn resting_state(value: &str) -> FieldState {
        if value.is_empty() {
            FieldState::Default
        } else {
            FieldState::Filled
        }
    }

    pub fn value(&self) -> &str {
        match &self.value {
            Value::Controlled(v) | Value::Uncontrolled(v) => v,
        }
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder
    }

    pub fn set_value(&mut self, value: &str) {
        match &mut self.value {
            Value::Controlled(v) => *v = value.to_owned(),
            Value::Uncontrolled(_) => {
                log::debug!("Ignoring host value for an uncontrolled picker")
            }
        }

        if self.state != FieldState::Active {
            self.state = Self::resting_state(value);
        }
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        if status == Status::Disabled {
            self.modal.cancel(&mut ());
            self.state = Self::resting_state(self.value());
        }
    }

    pub fn field_state(&self) -> FieldState {
        self.state
    }

    pub fn visual_state(&self) -> VisualState {
        match (self.status, self.state) {
            (Status::Disabled, _) => VisualState::Disabled,
            (Status::Error, _) => VisualState::Error,
            (Status::Warning, _) => VisualState::Warning,
            (Status::Normal, FieldState::Default) => VisualState::Default,
            (Status::Normal, FieldState::Active) => VisualState::Active,
            (Status::Normal, FieldState::Filled) => VisualState::Filled,
        }
    }

    pub fn modal(&self) -> &DatePickerModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut DatePickerModal {
        &mut self.modal
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn focus(&mut self) {
        if self.status == Status::Disabled {
            return;
        }

        self.state = FieldState::Active;
        if !self.modal.is_open() {
            let seed = self.value().to_owned();
            self.modal.open(Some(&seed));
        }
    }

    pub fn click(&mut self) {
        self.focus();
    }

    pub fn blur(&mut self) {
        self.state = Self::resting_state(self.value());
    }

    pub fn calendar_icon_click(&mut self, host: &mut impl PickerHost) {
        if self.status == Status::Disabled {
            return;
        }

        host.calendar_clicked();
        self.focus();
    }

    pub fn apply(&mut self, host: &mut impl PickerHost) -> bool {
        let mut applied = Applied::default();
        if !self.modal.apply(&mut applied) {
            return false;
        }

        let (start, end) = match applied.0 {
            Some(pair) => pair,
            None => return false,
        };

        let text = display_text(&start, &end, self.modal.selected_period());
        log::debug!("Picker value is now '{}'", text);

        if let Value::Uncontrolled(v) = &mut self.value {
            *v = text.clone();
        }
        self.state = Self::resting_state(&text);

        host.changed(ChangeEvent::new(text));
        host.date_range_changed(&start, &end);
        true
    }

    pub fn cancel(&mut self) {
        self.modal.cancel(&mut ());
        self.blur();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::calendar::tests::ymd;
    use crate::picker::Side;

    #[derive(Default)]
    struct Form {
        changes: Vec<ChangeEvent>,
        ranges: Vec<(String, String)>,
        icon_clicks: usize,
    }

    impl PickerHost for Form {
        fn changed(&mut self, event: ChangeEvent) {
            self.changes.push(event);
        }

        fn calendar_clicked(&mut self) {
            self.icon_clicks += 1;
        }

        fn date_range_changed(&mut self, start: &str, end: &str) {
            self.ranges.push((start.to_owned(), end.to_owned()));
        }
    }

    fn picker() -> DatePicker {
        DatePicker::new(DatePickerModal::new(ymd(2025, 1, 15)))
    }

    #[test]
    fn current_preset_shows_from() {
        let mut picker = picker();
        let mut form = Form::default();

        picker.focus();
        assert!(picker.is_open());
        picker.modal_mut().select_period(Period::Current);
        picker.modal_mut().click(Side::Left, ymd(2025, 6, 15));
        assert!(picker.apply(&mut form));

        assert_eq!(picker.value(), "From 15/06/2025");
        assert_eq!(form.changes, vec![ChangeEvent::new("From 15/06/2025".to_owned())]);
        assert_eq!(form.ranges, vec![("2025-06-15".to_owned(), String::new())]);
        assert_eq!(picker.visual_state(), VisualState::Filled);
        assert!(!picker.is_open());
    }

    #[test]
    fn custom_range_shows_both_dates() {
        let mut picker = picker();
        let mut form = Form::default();

        picker.click();
        picker.modal_mut().click(Side::Left, ymd(2025, 1, 1));
        picker.modal_mut().click(Side::Left, ymd(2025, 1, 10));
        assert!(picker.apply(&mut form));

        assert_eq!(picker.value(), "01/01/2025 to 10/01/2025");
        assert_eq!(
            form.ranges,
            vec![("2025-01-01".to_owned(), "2025-01-10".to_owned())]
        );
    }

    #[test]
    fn reopening_seeds_from_value() {
        let mut picker = picker().default_value("01/01/2025 to 10/01/2025");
        picker.focus();

        let modal = picker.modal();
        assert_eq!(modal.start().date(), Some(ymd(2025, 1, 1)));
        assert_eq!(modal.end().date(), Some(ymd(2025, 1, 10)));
        assert!(modal.can_apply());

        let mut form = Form::default();
        assert!(picker.apply(&mut form));
        assert_eq!(picker.value(), "01/01/2025 to 10/01/2025");
    }

    #[test]
    fn controlled_value_follows_host() {
        let mut picker = picker().controlled("");
        let mut form = Form::default();

        picker.focus();
        picker.modal_mut().select_period(Period::Current);
        picker.modal_mut().click(Side::Left, ymd(2025, 2, 2));
        assert!(picker.apply(&mut form));

        assert_eq!(picker.value(), "");
        assert_eq!(form.changes[0].target.value, "From 02/02/2025");

        picker.set_value(&form.changes[0].target.value);
        assert_eq!(picker.value(), "From 02/02/2025");
        assert_eq!(picker.field_state(), FieldState::Filled);
    }

    #[test]
    fn cancel_keeps_value() {
        let mut picker = picker().default_value("From 02/02/2025");
        picker.focus();
        picker.modal_mut().clear(&mut ());
        picker.cancel();

        assert!(!picker.is_open());
        assert_eq!(picker.value(), "From 02/02/2025");
        assert_eq!(picker.visual_state(), VisualState::Filled);
    }

    #[test]
    fn focus_and_blur_states() {
        let mut picker = picker();
        assert_eq!(picker.visual_state(), VisualState::Default);

        picker.focus();
        assert_eq!(picker.visual_state(), VisualState::Active);

        picker.cancel();
        assert_eq!(picker.visual_state(), VisualState::Default);
    }

    #[test]
    fn host_status_overrides() {
        let mut picker = picker().status(Status::Error);
        picker.focus();
        assert_eq!(picker.field_state(), FieldState::Active);
        assert_eq!(picker.visual_state(), VisualState::Error);

        picker.set_status(Status::Warning);
        assert_eq!(picker.visual_state(), VisualState::Warning);

        picker.set_status(Status::Disabled);
        assert!(!picker.is_open());
        assert_eq!(picker.visual_state(), VisualState::Disabled);
    }

    #[test]
    fn disabled_picker_does_not_open() {
        let mut picker = picker().status(Status::Disabled);
        let mut form = Form::default();

        picker.focus();
        picker.calendar_icon_click(&mut form);

        assert!(!picker.is_open());
        assert_eq!(form.icon_clicks, 0);
    }

    #[test]
    fn icon_click_notifies_and_opens() {
        let mut picker = picker();
        let mut form = Form::default();

        picker.calendar_icon_click(&mut form);
        assert_eq!(form.icon_clicks, 1);
        assert!(picker.is_open());
    }

    #[test]
    fn display_text_rules() {
        assert_eq!(
            display_text("2025-06-15", "", Period::Current),
            "From 15/06/2025"
        );
        assert_eq!(display_text("2025-06-15", "", Period::Custom), "15/06/2025");
        assert_eq!(
            display_text("2025-06-15", "2026-06-15", Period::OneYear),
            "15/06/2025 to 15/06/2026"
        );
        assert_eq!(
            display_text("soon", "2026-06-15", Period::Custom),
            "soon to 15/06/2026"
        );
    }
}
