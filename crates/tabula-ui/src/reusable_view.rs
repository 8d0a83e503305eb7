//! Binding components to recycled container views.
//!
//! A container keeps the component's root view (the contained view) across
//! reuse. Binding a component whose view type matches the contained view
//! renders into it again; any other component gets a freshly generated view
//! that replaces the old one, cross-fading while the container is on screen.

use std::cell::{Cell, RefCell};

use tabula_core::{
    for_each_view_in_subtree, view_type_id, AnyRenderable, ReuseIdentifier, ReuseScope,
    ReuseToken, ViewRef, ViewStorage,
};

use crate::host::ContentView;

/// Seconds taken by the cross-fade when a contained view is replaced.
pub const CROSS_FADE_DURATION: f32 = 0.3;

#[derive(Default)]
struct BindingState {
    component: Option<AnyRenderable>,
    contained: Option<ViewRef>,
    storage: ViewStorage,
}

/// Binder shared by every reusable container.
pub struct ViewBinding {
    content_view: Box<dyn ContentView>,
    state: RefCell<BindingState>,
    scope: ReuseScope,
    reuse_identifier: Cell<Option<ReuseIdentifier>>,
    token: RefCell<ReuseToken>,
    on_screen: Cell<bool>,
}

impl ViewBinding {
    pub fn new(content_view: Box<dyn ContentView>) -> Self {
        Self {
            content_view,
            state: RefCell::new(BindingState::default()),
            scope: ReuseScope::new(),
            reuse_identifier: Cell::new(None),
            token: RefCell::new(ReuseToken::inactive()),
            on_screen: Cell::new(false),
        }
    }

    pub fn content_view(&self) -> &dyn ContentView {
        self.content_view.as_ref()
    }

    pub fn component(&self) -> Option<AnyRenderable> {
        self.state.borrow().component.clone()
    }

    pub fn contained_view(&self) -> Option<ViewRef> {
        self.state.borrow().contained.clone()
    }

    /// Reuse-pool bucket this container was last bound for.
    pub fn reuse_identifier(&self) -> Option<ReuseIdentifier> {
        self.reuse_identifier.get()
    }

    pub fn is_on_screen(&self) -> bool {
        self.on_screen.get()
    }

    /// Token for work scoped to the current binding.
    pub fn reuse_token(&self) -> ReuseToken {
        self.token.borrow().clone()
    }

    /// Runs `f` with the storage of the contained view.
    pub fn with_storage<T>(&self, f: impl FnOnce(&mut ViewStorage) -> T) -> T {
        f(&mut self.state.borrow_mut().storage)
    }

    /// Binds `component`, reusing the contained view when its type matches.
    /// `None` removes the contained view.
    ///
    /// Component callbacks run without the binding borrowed, so they may call
    /// back into it. The storage is lent to `did_mount` and `will_unmount`;
    /// [`with_storage`](Self::with_storage) sees an empty one meanwhile.
    pub fn bind(&self, component: Option<AnyRenderable>) {
        self.scope.invalidate();
        self.token.replace(ReuseToken::inactive());
        let (previous, contained) = self.snapshot();
        if let (Some(previous), Some(view)) = (&previous, &contained) {
            self.lend_storage(|storage| previous.will_unmount(view.as_ref(), storage));
        }

        let Some(component) = component else {
            let old = {
                let mut state = self.state.borrow_mut();
                state.component = None;
                state.storage.clear();
                state.storage.set_reuse_token(ReuseToken::inactive());
                state.contained.take()
            };
            self.replace_contained(old, None);
            return;
        };

        let reusable =
            contained.filter(|view| view_type_id(view.as_ref()) == component.view_type());
        let view = match reusable {
            Some(view) => view,
            None => {
                let view = component.generate();
                let old = {
                    let mut state = self.state.borrow_mut();
                    state.storage.clear();
                    state.contained.replace(view.clone())
                };
                self.replace_contained(old, Some(view.clone()));
                view
            }
        };

        let token = self.scope.token();
        {
            let mut state = self.state.borrow_mut();
            state.component = Some(component.clone());
            state.storage.set_reuse_token(token.clone());
        }
        self.token.replace(token);
        self.reuse_identifier.set(Some(component.reuse_identifier()));

        component.render(view.as_ref());
        self.lend_storage(|storage| component.did_mount(view.as_ref(), storage));
    }

    fn lend_storage(&self, f: impl FnOnce(&mut ViewStorage)) {
        let mut storage = std::mem::take(&mut self.state.borrow_mut().storage);
        f(&mut storage);
        self.state.borrow_mut().storage = storage;
    }

    /// Ends the current binding generation before the container is parked
    /// in a reuse pool. The component and view stay in place.
    pub fn prepare_for_reuse(&self) {
        self.scope.invalidate();
        self.on_screen.set(false);
    }

    pub fn will_display(&self) {
        let (component, view) = self.snapshot();
        if let Some(component) = &component {
            if let Some(aware) = component.as_lifecycle_aware() {
                aware.will_display_item();
            }
            if let Some(view) = &view {
                component.will_display(view.as_ref());
            }
        }
        if let Some(view) = &view {
            for_each_view_in_subtree(view, &mut |view| {
                if let Some(aware) = view.lifecycle_aware() {
                    aware.will_display_view();
                }
            });
        }
        self.on_screen.set(true);
    }

    pub fn did_end_displaying(&self) {
        let (component, view) = self.snapshot();
        if let Some(component) = &component {
            if let Some(aware) = component.as_lifecycle_aware() {
                aware.did_end_displaying_item();
            }
            if let Some(view) = &view {
                component.did_end_displaying(view.as_ref());
            }
        }
        if let Some(view) = &view {
            for_each_view_in_subtree(view, &mut |view| {
                if let Some(aware) = view.lifecycle_aware() {
                    aware.did_end_displaying_view();
                }
            });
        }
        self.on_screen.set(false);
    }

    // Callbacks run without the state borrowed so they may inspect the binding.
    fn snapshot(&self) -> (Option<AnyRenderable>, Option<ViewRef>) {
        let state = self.state.borrow();
        (state.component.clone(), state.contained.clone())
    }

    fn replace_contained(&self, old: Option<ViewRef>, new: Option<ViewRef>) {
        let content = self.content_view.as_ref();
        match (old, new) {
            (Some(old), Some(new)) if self.on_screen.get() && content.animations_enabled() => {
                content.transition(CROSS_FADE_DURATION, &mut || {
                    content.remove_subview(&old);
                    content.add_subview(&new);
                });
            }
            (old, new) => {
                if let Some(old) = old {
                    content.remove_subview(&old);
                }
                if let Some(new) = new {
                    content.add_subview(&new);
                }
            }
        }
    }
}

/// A container view that displays one component at a time.
pub trait ReusableView {
    fn binding(&self) -> &ViewBinding;

    fn bind(&self, component: Option<AnyRenderable>) {
        self.binding().bind(component);
    }

    fn component(&self) -> Option<AnyRenderable> {
        self.binding().component()
    }

    fn contained_view(&self) -> Option<ViewRef> {
        self.binding().contained_view()
    }

    fn will_display_view(&self) {
        self.binding().will_display();
    }

    fn did_end_displaying_view(&self) {
        self.binding().did_end_displaying();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::rc::Rc;
    use tabula_core::{NativeView, Renderable, Size, SizeConstraint, View};

    #[derive(Default)]
    struct Events(RefCell<Vec<String>>);

    impl Events {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    struct RecordingContent {
        events: Rc<Events>,
        animated: bool,
    }

    impl ContentView for RecordingContent {
        fn add_subview(&self, _view: &ViewRef) {
            self.events.0.borrow_mut().push("add".into());
        }

        fn remove_subview(&self, _view: &ViewRef) {
            self.events.0.borrow_mut().push("remove".into());
        }

        fn animations_enabled(&self) -> bool {
            self.animated
        }

        fn transition(&self, duration: f32, changes: &mut dyn FnMut()) {
            self.events
                .0
                .borrow_mut()
                .push(format!("transition {duration}"));
            changes();
        }
    }

    #[derive(Default)]
    struct TextView(RefCell<String>);

    impl View for TextView {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn fitting_size(&self, _constraint: SizeConstraint) -> Size {
            Size::ZERO
        }
    }

    impl NativeView for TextView {
        fn generate() -> Self {
            Self::default()
        }
    }

    #[derive(Default)]
    struct ImageView;

    impl View for ImageView {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn fitting_size(&self, _constraint: SizeConstraint) -> Size {
            Size::ZERO
        }
    }

    impl NativeView for ImageView {
        fn generate() -> Self {
            ImageView
        }
    }

    #[derive(PartialEq)]
    struct Title(&'static str);

    impl Renderable for Title {
        type View = TextView;

        fn render(&self, view: &TextView) {
            *view.0.borrow_mut() = self.0.to_string();
        }
    }

    #[derive(PartialEq)]
    struct Subtitle(&'static str);

    impl Renderable for Subtitle {
        type View = TextView;

        fn render(&self, view: &TextView) {
            *view.0.borrow_mut() = format!("({})", self.0);
        }
    }

    #[derive(PartialEq)]
    struct Icon;

    impl Renderable for Icon {
        type View = ImageView;

        fn render(&self, _view: &ImageView) {}
    }

    /// Reads its own container back from every hook.
    struct Introspecting {
        container: Rc<RefCell<Option<Rc<ViewBinding>>>>,
        seen: Rc<Events>,
    }

    impl Introspecting {
        fn record(&self, hook: &str) {
            let container = self.container.borrow().clone().expect("container");
            let bound = container.component().is_some();
            let active = container.reuse_token().is_active();
            self.seen
                .0
                .borrow_mut()
                .push(format!("{hook} bound={bound} active={active}"));
        }
    }

    impl PartialEq for Introspecting {
        fn eq(&self, _other: &Self) -> bool {
            false
        }
    }

    impl Renderable for Introspecting {
        type View = TextView;

        fn render(&self, _view: &TextView) {
            self.record("render");
        }

        fn did_mount(&self, _view: &TextView, storage: &mut ViewStorage) {
            storage.insert(7_u8);
            self.record("did_mount");
        }

        fn will_unmount(&self, _view: &TextView, storage: &mut ViewStorage) {
            assert_eq!(storage.get::<u8>(), Some(&7));
            self.record("will_unmount");
        }
    }

    fn binding(animated: bool) -> (ViewBinding, Rc<Events>) {
        let events = Rc::new(Events::default());
        let content = RecordingContent {
            events: events.clone(),
            animated,
        };
        (ViewBinding::new(Box::new(content)), events)
    }

    fn text_of(binding: &ViewBinding) -> String {
        let view = binding.contained_view().expect("contained view");
        let text = view.as_any().downcast_ref::<TextView>().expect("text view");
        let value = text.0.borrow().clone();
        value
    }

    #[test]
    fn test_same_view_type_is_rendered_in_place() {
        let (binding, events) = binding(true);
        binding.bind(Some(Title("a").into()));
        let first = binding.contained_view().expect("contained view");
        assert_eq!(events.take(), vec!["add"]);

        binding.bind(Some(Title("b").into()));
        let second = binding.contained_view().expect("contained view");
        assert!(Rc::ptr_eq(&first, &second));
        assert!(events.take().is_empty());
        assert_eq!(text_of(&binding), "b");
    }

    #[test]
    fn test_components_sharing_a_view_type_reuse_the_view() {
        let (binding, events) = binding(true);
        binding.bind(Some(Title("a").into()));
        events.take();

        binding.bind(Some(Subtitle("b").into()));
        assert!(events.take().is_empty());
        assert_eq!(text_of(&binding), "(b)");
        assert_eq!(
            binding.reuse_identifier(),
            Some(ReuseIdentifier::of::<Subtitle>())
        );
    }

    #[test]
    fn test_other_view_type_cross_fades_on_screen() {
        let (binding, events) = binding(true);
        binding.bind(Some(Title("a").into()));
        binding.will_display();
        events.take();

        binding.bind(Some(Icon.into()));
        assert_eq!(events.take(), vec!["transition 0.3", "remove", "add"]);
        let view = binding.contained_view().expect("contained view");
        assert!(view.as_any().is::<ImageView>());
    }

    #[test]
    fn test_replacement_without_animations_swaps_directly() {
        let (binding, events) = binding(false);
        binding.bind(Some(Title("a").into()));
        binding.bind(Some(Icon.into()));
        assert_eq!(events.take(), vec!["add", "remove", "add"]);
    }

    #[test]
    fn test_off_screen_replacement_swaps_directly() {
        let (binding, events) = binding(true);
        binding.bind(Some(Title("a").into()));
        binding.will_display();
        binding.did_end_displaying();
        binding.bind(Some(Icon.into()));
        assert_eq!(events.take(), vec!["add", "remove", "add"]);
    }

    #[test]
    fn test_binding_nothing_removes_view() {
        let (binding, events) = binding(true);
        binding.bind(Some(Title("a").into()));
        binding.bind(None);
        assert_eq!(events.take(), vec!["add", "remove"]);
        assert!(binding.contained_view().is_none());
        assert!(binding.component().is_none());
        assert!(!binding.reuse_token().is_active());
    }

    #[test]
    fn test_reuse_token_ends_at_next_reuse() {
        let (binding, _events) = binding(true);
        binding.bind(Some(Title("a").into()));
        let first = binding.reuse_token();
        assert!(first.is_active());

        binding.bind(Some(Title("b").into()));
        let second = binding.reuse_token();
        assert!(!first.is_active());
        assert!(second.is_active());

        binding.prepare_for_reuse();
        assert!(!second.is_active());
    }

    #[test]
    fn test_hooks_may_read_their_container() {
        let (binding, _events) = binding(true);
        let binding = Rc::new(binding);
        let container = Rc::new(RefCell::new(Some(binding.clone())));
        let seen = Rc::new(Events::default());
        let component = || Introspecting {
            container: container.clone(),
            seen: seen.clone(),
        };

        binding.bind(Some(component().into()));
        binding.bind(None);

        assert_eq!(
            seen.take(),
            vec![
                "render bound=true active=true",
                "did_mount bound=true active=true",
                "will_unmount bound=true active=false",
            ]
        );
        binding.with_storage(|storage| assert!(storage.is_empty()));
        container.borrow_mut().take();
    }
}
