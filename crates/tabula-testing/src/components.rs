//! Sample components and native views for exercising the adapter.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tabula_core::{
    bound_channel, BoundReceiver, BoundSender, ComponentLifecycleAware, Deletable, EdgeInsets,
    Focusable, MenuAction, MenuItem, MenuItemsResponding, NativeView, Renderable, Size,
    SizeConstraint, View, ViewLifecycleAware, ViewRef, ViewStorage,
};
use tabula_ui::ViewBinding;

/// Shared, ordered record of callbacks observed during a test.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// A text view. Each line is [`LabelView::LINE_HEIGHT`] tall.
#[derive(Default)]
pub struct LabelView {
    text: RefCell<String>,
    margins: Cell<EdgeInsets>,
    displayed: Cell<usize>,
    ended: Cell<usize>,
}

impl LabelView {
    pub const LINE_HEIGHT: f32 = 20.0;
    pub const CHAR_WIDTH: f32 = 8.0;

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    /// Times the view was told it went on screen.
    pub fn display_count(&self) -> usize {
        self.displayed.get()
    }

    pub fn end_display_count(&self) -> usize {
        self.ended.get()
    }
}

impl View for LabelView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lifecycle_aware(&self) -> Option<&dyn ViewLifecycleAware> {
        Some(self)
    }

    fn layout_margins(&self) -> EdgeInsets {
        self.margins.get()
    }

    fn set_layout_margins(&self, margins: EdgeInsets) {
        self.margins.set(margins);
    }

    fn fitting_size(&self, constraint: SizeConstraint) -> Size {
        let text = self.text.borrow();
        let margins = self.margins.get();
        let lines = text.lines().count().max(1) as f32;
        let longest = text.lines().map(str::len).max().unwrap_or(0) as f32;
        let natural = Size::new(
            longest * Self::CHAR_WIDTH + margins.left + margins.right,
            lines * Self::LINE_HEIGHT + margins.top + margins.bottom,
        );
        match constraint {
            SizeConstraint::Width(width) => Size::new(width, natural.height),
            SizeConstraint::Height(height) => Size::new(natural.width, height),
            SizeConstraint::Size(size) => size,
        }
    }
}

impl ViewLifecycleAware for LabelView {
    fn will_display_view(&self) {
        self.displayed.set(self.displayed.get() + 1);
    }

    fn did_end_displaying_view(&self) {
        self.ended.set(self.ended.get() + 1);
    }
}

impl NativeView for LabelView {
    fn generate() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Renderable for Label {
    type View = LabelView;

    fn render(&self, view: &LabelView) {
        view.set_text(&self.text);
    }
}

/// A titled switch.
#[derive(Default)]
pub struct ToggleView {
    pub title: RefCell<String>,
    pub is_on: Cell<bool>,
}

impl View for ToggleView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fitting_size(&self, constraint: SizeConstraint) -> Size {
        let target = constraint.target_size();
        Size::new(target.width.min(320.0), 44.0)
    }
}

impl NativeView for ToggleView {
    fn generate() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toggle {
    pub title: String,
    pub is_on: bool,
    pub is_enabled: bool,
}

impl Toggle {
    pub fn new(title: impl Into<String>, is_on: bool) -> Self {
        Self {
            title: title.into(),
            is_on,
            is_enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }
}

impl Renderable for Toggle {
    type View = ToggleView;

    fn render(&self, view: &ToggleView) {
        *view.title.borrow_mut() = self.title.clone();
        view.is_on.set(self.is_on);
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Focusable for Toggle {
    fn is_focus_eligible(&self) -> bool {
        self.is_enabled
    }
}

/// A label that can be swiped away. Deletions are appended to `deleted`.
#[derive(Clone, Debug)]
pub struct DeletableLabel {
    pub text: String,
    pub can_be_deleted: bool,
    pub deleted: EventLog,
}

impl DeletableLabel {
    pub fn new(text: impl Into<String>, deleted: &EventLog) -> Self {
        Self {
            text: text.into(),
            can_be_deleted: true,
            deleted: deleted.clone(),
        }
    }

    pub fn locked(mut self) -> Self {
        self.can_be_deleted = false;
        self
    }
}

impl PartialEq for DeletableLabel {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.can_be_deleted == other.can_be_deleted
    }
}

impl Renderable for DeletableLabel {
    type View = LabelView;

    fn render(&self, view: &LabelView) {
        view.set_text(&self.text);
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }
}

impl Deletable for DeletableLabel {
    fn delete_action_text(&self) -> String {
        "Remove".to_string()
    }

    fn can_be_deleted(&self) -> bool {
        self.can_be_deleted
    }

    fn delete(&self) {
        self.deleted.borrow_mut().push(self.text.clone());
    }
}

/// A label with a contextual menu. Performed actions are appended to
/// `performed`.
#[derive(Clone, Debug)]
pub struct MenuLabel {
    pub text: String,
    pub actions: Vec<MenuAction>,
    pub performed: EventLog,
}

impl MenuLabel {
    pub fn new(text: impl Into<String>, performed: &EventLog) -> Self {
        Self {
            text: text.into(),
            actions: vec![MenuAction::copy()],
            performed: performed.clone(),
        }
    }
}

impl PartialEq for MenuLabel {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.actions == other.actions
    }
}

impl Renderable for MenuLabel {
    type View = LabelView;

    fn render(&self, view: &LabelView) {
        view.set_text(&self.text);
    }

    fn as_menu_responding(&self) -> Option<&dyn MenuItemsResponding> {
        Some(self)
    }
}

impl MenuItemsResponding for MenuLabel {
    fn menu_items(&self) -> Vec<MenuItem> {
        self.actions
            .iter()
            .map(|action| MenuItem::new(action.0.clone(), action.clone()))
            .collect()
    }

    fn responds_to(&self, action: &MenuAction) -> bool {
        self.actions.contains(action)
    }

    fn perform(&self, action: &MenuAction) {
        self.performed
            .borrow_mut()
            .push(format!("{} {}", action.0, self.text));
    }
}

/// A view with two nested labels, used to observe subtree forwarding.
pub struct TrackedView {
    pub title: Rc<LabelView>,
    pub detail: Rc<LabelView>,
}

impl View for TrackedView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subviews(&self) -> Vec<ViewRef> {
        vec![self.title.clone(), self.detail.clone()]
    }

    fn fitting_size(&self, constraint: SizeConstraint) -> Size {
        let title = self.title.fitting_size(constraint);
        let detail = self.detail.fitting_size(constraint);
        Size::new(title.width.max(detail.width), title.height + detail.height)
    }
}

impl NativeView for TrackedView {
    fn generate() -> Self {
        Self {
            title: Rc::new(LabelView::generate()),
            detail: Rc::new(LabelView::generate()),
        }
    }
}

/// Records every lifecycle callback it receives into `log`, tagged with its
/// name.
#[derive(Clone, Debug)]
pub struct LifecycleRecorder {
    pub name: String,
    pub log: EventLog,
}

impl LifecycleRecorder {
    pub fn new(name: impl Into<String>, log: &EventLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{event} {}", self.name));
    }
}

impl PartialEq for LifecycleRecorder {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Renderable for LifecycleRecorder {
    type View = TrackedView;

    fn render(&self, view: &TrackedView) {
        view.title.set_text(&self.name);
        self.record("render");
    }

    fn did_mount(&self, _view: &TrackedView, storage: &mut ViewStorage) {
        storage.insert(self.name.clone());
        self.record("mount");
    }

    fn will_unmount(&self, _view: &TrackedView, storage: &mut ViewStorage) {
        storage.remove::<String>();
        self.record("unmount");
    }

    fn will_display(&self, _view: &TrackedView) {
        self.record("will_display");
    }

    fn did_end_displaying(&self, _view: &TrackedView) {
        self.record("did_end_displaying");
    }

    fn as_lifecycle_aware(&self) -> Option<&dyn ComponentLifecycleAware> {
        Some(self)
    }
}

impl ComponentLifecycleAware for LifecycleRecorder {
    fn will_display_item(&self) {
        self.record("item_will_display");
    }

    fn did_end_displaying_item(&self) {
        self.record("item_did_end_displaying");
    }
}

/// Slot through which a test reaches the producer side of the latest
/// [`AsyncLabel`] binding.
pub type SenderSlot = Rc<RefCell<Option<BoundSender<String>>>>;

/// A label whose text is later replaced by values produced off the UI
/// thread. Updates stop at the next reuse of its view.
#[derive(Clone, Debug)]
pub struct AsyncLabel {
    pub placeholder: String,
    pub sender: SenderSlot,
}

impl AsyncLabel {
    pub fn new(placeholder: impl Into<String>, sender: &SenderSlot) -> Self {
        Self {
            placeholder: placeholder.into(),
            sender: sender.clone(),
        }
    }

    /// Applies pending text updates to the view held by `binding`. Returns
    /// the number of updates applied.
    pub fn pump(binding: &ViewBinding) -> usize {
        let Some(view) = binding.contained_view() else {
            return 0;
        };
        let Some(label) = view.as_any().downcast_ref::<LabelView>() else {
            return 0;
        };
        binding.with_storage(|storage| {
            storage
                .get::<BoundReceiver<String>>()
                .map_or(0, |receiver| receiver.drain(|text| label.set_text(&text)))
        })
    }
}

impl PartialEq for AsyncLabel {
    fn eq(&self, other: &Self) -> bool {
        self.placeholder == other.placeholder
    }
}

impl Renderable for AsyncLabel {
    type View = LabelView;

    fn render(&self, view: &LabelView) {
        view.set_text(&self.placeholder);
    }

    fn did_mount(&self, _view: &LabelView, storage: &mut ViewStorage) {
        let (sender, receiver) = bound_channel(storage.reuse_token());
        storage.insert(receiver);
        *self.sender.borrow_mut() = Some(sender);
    }

    fn will_unmount(&self, _view: &LabelView, storage: &mut ViewStorage) {
        storage.remove::<BoundReceiver<String>>();
    }
}
