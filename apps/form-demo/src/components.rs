use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tabula_core::{
    Deletable, EdgeInsets, Focusable, MenuAction, MenuItem, MenuItemsResponding, NativeView,
    Renderable, Size, SizeConstraint, View,
};

const LINE_HEIGHT: f32 = 22.0;
const GLYPH_WIDTH: f32 = 9.0;
const ROW_INSETS: EdgeInsets = EdgeInsets::new(11.0, 16.0, 11.0, 16.0);

/// Multi-line text.
#[derive(Default)]
pub struct TextView {
    text: RefCell<String>,
    margins: Cell<EdgeInsets>,
}

impl TextView {
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

impl View for TextView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn layout_margins(&self) -> EdgeInsets {
        self.margins.get()
    }

    fn set_layout_margins(&self, margins: EdgeInsets) {
        self.margins.set(margins);
    }

    fn fitting_size(&self, constraint: SizeConstraint) -> Size {
        let margins = self.margins.get();
        let target = constraint.target_size();
        let available = (target.width - margins.left - margins.right).max(GLYPH_WIDTH);
        let per_line = (available / GLYPH_WIDTH).floor().max(1.0) as usize;
        let lines: usize = self
            .text
            .borrow()
            .lines()
            .map(|line| line.len().div_ceil(per_line).max(1))
            .sum::<usize>()
            .max(1);
        let height = lines as f32 * LINE_HEIGHT + margins.top + margins.bottom;
        match constraint {
            SizeConstraint::Width(width) => Size::new(width, height),
            SizeConstraint::Height(height) => Size::new(target.width, height),
            SizeConstraint::Size(size) => size,
        }
    }
}

impl NativeView for TextView {
    fn generate() -> Self {
        let view = Self::default();
        view.margins.set(ROW_INSETS);
        view
    }
}

/// Plain text row.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRow {
    pub text: String,
}

impl TextRow {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Renderable for TextRow {
    type View = TextView;

    fn render(&self, view: &TextView) {
        *view.text.borrow_mut() = self.text.clone();
    }
}

/// Section header title. Renders into the same view type as [`TextRow`].
#[derive(Clone, Debug, PartialEq)]
pub struct SectionTitle(pub String);

impl Renderable for SectionTitle {
    type View = TextView;

    fn render(&self, view: &TextView) {
        *view.text.borrow_mut() = self.0.to_uppercase();
    }
}

#[derive(Default)]
pub struct SwitchView {
    title: RefCell<String>,
    is_on: Cell<bool>,
    is_enabled: Cell<bool>,
}

impl SwitchView {
    pub fn describe(&self) -> String {
        let state = if self.is_on.get() { "on" } else { "off" };
        let disabled = if self.is_enabled.get() { "" } else { ", disabled" };
        format!("{} [{state}{disabled}]", self.title.borrow())
    }
}

impl View for SwitchView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fitting_size(&self, constraint: SizeConstraint) -> Size {
        Size::new(constraint.target_size().width, 44.0)
    }
}

impl NativeView for SwitchView {
    fn generate() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchRow {
    pub title: String,
    pub is_on: bool,
    pub is_enabled: bool,
}

impl SwitchRow {
    pub fn new(title: impl Into<String>, is_on: bool) -> Self {
        Self {
            title: title.into(),
            is_on,
            is_enabled: true,
        }
    }

    pub fn enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }
}

impl Renderable for SwitchRow {
    type View = SwitchView;

    fn render(&self, view: &SwitchView) {
        *view.title.borrow_mut() = self.title.clone();
        view.is_on.set(self.is_on);
        view.is_enabled.set(self.is_enabled);
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Focusable for SwitchRow {
    fn is_focus_eligible(&self) -> bool {
        self.is_enabled
    }
}

/// Shared list of reminder titles owned by the app.
pub type Reminders = Rc<RefCell<Vec<String>>>;

/// A reminder that can be swiped away and copied.
#[derive(Clone)]
pub struct ReminderRow {
    pub title: String,
    reminders: Reminders,
}

impl ReminderRow {
    pub fn new(title: impl Into<String>, reminders: &Reminders) -> Self {
        Self {
            title: title.into(),
            reminders: reminders.clone(),
        }
    }
}

impl PartialEq for ReminderRow {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Renderable for ReminderRow {
    type View = TextView;

    fn render(&self, view: &TextView) {
        *view.text.borrow_mut() = format!("- {}", self.title);
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }

    fn as_menu_responding(&self) -> Option<&dyn MenuItemsResponding> {
        Some(self)
    }
}

impl Deletable for ReminderRow {
    fn delete_action_text(&self) -> String {
        "Done".to_string()
    }

    fn delete(&self) {
        self.reminders
            .borrow_mut()
            .retain(|title| title != &self.title);
    }
}

impl MenuItemsResponding for ReminderRow {
    fn menu_items(&self) -> Vec<MenuItem> {
        vec![MenuItem::new("Copy", MenuAction::copy())]
    }

    fn responds_to(&self, action: &MenuAction) -> bool {
        *action == MenuAction::copy()
    }

    fn perform(&self, action: &MenuAction) {
        log::info!("{} copied to pasteboard via {:?}", self.title, action);
    }
}
