use super::*;
use std::any::Any;
use std::cell::RefCell;

#[derive(Default)]
struct LabelView {
    text: RefCell<String>,
    margins: RefCell<EdgeInsets>,
}

impl View for LabelView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn layout_margins(&self) -> EdgeInsets {
        *self.margins.borrow()
    }

    fn set_layout_margins(&self, margins: EdgeInsets) {
        *self.margins.borrow_mut() = margins;
    }

    fn fitting_size(&self, constraint: SizeConstraint) -> Size {
        let margins = *self.margins.borrow();
        Size::new(
            constraint.target_size().width,
            20.0 + margins.top + margins.bottom,
        )
    }
}

impl NativeView for LabelView {
    fn generate() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Label(String);

impl Label {
    fn new(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl Renderable for Label {
    type View = LabelView;

    fn render(&self, view: &LabelView) {
        *view.text.borrow_mut() = self.0.clone();
    }
}

#[test]
fn test_node_equality_covers_id_and_component() {
    let a = Node::new(1, Label::new("a"));
    assert_eq!(a, Node::new(1, Label::new("a")));
    assert_ne!(a, Node::new(2, Label::new("a")));
    assert_ne!(a, Node::new(1, Label::new("b")));
    assert_eq!(a.component_as::<Label>(), Some(&Label::new("a")));
}

#[test]
fn test_inherited_margins_raise_view_margins_when_measuring() {
    let node = Node::new("row", Label::new("a"));
    let size = node.size_bound_to(
        SizeConstraint::Width(200.0),
        EdgeInsets::new(8.0, 16.0, 4.0, 16.0),
    );
    assert_eq!(size, Size::new(200.0, 32.0));
}

#[test]
fn test_section_supplements_are_keyed_by_tag() {
    let section: Section<&str, u32> = Section::new("s")
        .header(Label::new("Header"))
        .adding(Supplement::custom("badge"), Label::new("3"))
        .row(1, Label::new("one"));

    assert!(section.has(&Supplement::Header));
    assert!(!section.has(&Supplement::Footer));
    assert_eq!(
        section.component::<Label>(&Supplement::custom("badge")),
        Some(&Label::new("3"))
    );

    let section = section.removing(&Supplement::Header);
    assert!(!section.has(&Supplement::Header));
    assert_eq!(section.len(), 1);
}

#[test]
fn test_absent_supplement_has_no_size() {
    let section: Section<&str, u32> = Section::new("s").footer(Label::new("Footer"));
    let constraint = SizeConstraint::Width(100.0);
    assert_eq!(
        section.component_size(&Supplement::Header, constraint, EdgeInsets::ZERO),
        None
    );
    assert_eq!(
        section.component_size(&Supplement::Footer, constraint, EdgeInsets::ZERO),
        Some(Size::new(100.0, 20.0))
    );
}

#[test]
fn test_form_keeps_section_order() {
    let form: Form<&str, u32> = Form::new()
        .section(Section::new("a").row(1, Label::new("1")))
        .section(Section::new("b").row(2, Label::new("2")).row(3, Label::new("3")));

    let ids: Vec<_> = form.iter().map(|section| section.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(form.row_count(), 3);
}

#[test]
fn test_section_debug_lists_supplements_and_rows() {
    let section: Section<&str, u32> = Section::new("s")
        .header(Label::new("h"))
        .row(7, Label::new("x"));
    let description = format!("{:?}", section);
    assert!(description.starts_with("<\"s\"; header = "));
    assert!(description.contains("<7; "));
}
