use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use tabula_core::{IndexPath, Node, Section};
use tabula_testing::prelude::*;
use tabula_ui::{ReusableView, TableAdapterSpec, TableViewAnimation, CROSS_FADE_DURATION};

fn tracked_rows(log: &EventLog, rows: &[(u32, &str)]) -> Vec<Section<&'static str, u32>> {
    vec![Section::with_rows(
        "S",
        rows.iter()
            .map(|&(id, name)| Node::new(id, LifecycleRecorder::new(name, log))),
    )]
}

fn first() -> IndexPath {
    IndexPath::new(0, 0)
}

fn tracked_view(harness: &TableHarness<&'static str, u32>) -> Rc<dyn tabula_core::View> {
    harness.cell(first()).contained_view().expect("contained view")
}

#[test]
fn test_display_callbacks_reach_component_and_view_subtree() {
    let log = event_log();
    let mut harness = TableHarness::new();
    harness.load(tracked_rows(&log, &[(1, "a")]));

    assert_eq!(
        *log.borrow(),
        vec!["render a", "mount a", "item_will_display a", "will_display a"]
    );
    let view = tracked_view(&harness);
    let tracked = view.as_any().downcast_ref::<TrackedView>().expect("tracked view");
    assert_eq!(tracked.title.display_count(), 1);
    assert_eq!(tracked.detail.display_count(), 1);
    assert!(harness.cell(first()).binding().is_on_screen());
}

#[test]
fn test_recycled_cell_unmounts_before_next_component() {
    let log = event_log();
    let mut harness = TableHarness::new();
    harness.load(tracked_rows(&log, &[(1, "a")]));
    let before = tracked_view(&harness);
    log.borrow_mut().clear();

    harness.update(tracked_rows(&log, &[(2, "b")]), TableViewAnimation::automatic());

    assert_eq!(
        *log.borrow(),
        vec![
            "item_did_end_displaying a",
            "did_end_displaying a",
            "unmount a",
            "render b",
            "mount b",
            "item_will_display b",
            "will_display b",
        ]
    );
    let after = tracked_view(&harness);
    assert!(Rc::ptr_eq(&before, &after));
    let tracked = after.as_any().downcast_ref::<TrackedView>().expect("tracked view");
    assert_eq!(tracked.title.end_display_count(), 1);
    assert_eq!(tracked.title.display_count(), 2);
    assert_eq!(tracked.title.text(), "b");
}

#[test]
fn test_storage_is_kept_while_view_is_reused() {
    let log = event_log();
    let mut harness = TableHarness::new();
    harness.load(tracked_rows(&log, &[(1, "a")]));

    let cell = harness.cell(first());
    let stored = cell
        .binding()
        .with_storage(|storage| storage.get::<String>().cloned());
    assert_eq!(stored.as_deref(), Some("a"));

    harness.update(tracked_rows(&log, &[(1, "b")]), TableViewAnimation::automatic());
    let stored = harness
        .cell(first())
        .binding()
        .with_storage(|storage| storage.get::<String>().cloned());
    assert_eq!(stored.as_deref(), Some("b"));
}

#[test]
fn test_changing_view_type_cross_fades_in_the_cell() {
    let mut harness = TableHarness::new();
    harness.load(vec![Section::with_rows("S", [Node::new(1, Label::new("a"))])]);
    let cell = harness.cell(first());

    cell.bind(Some(Toggle::new("b", true).into()));

    let content = harness.host().content_views();
    let state = content[0].borrow();
    assert_eq!(state.transitions, vec![CROSS_FADE_DURATION]);
    assert_eq!(state.subviews.len(), 1);
    assert!(state.subviews[0].as_any().is::<ToggleView>());
}

#[test]
fn test_hosts_without_animations_swap_views_directly() {
    let host = TestListHost::default().without_animations();
    let mut harness = TableHarness::with_host(host, TableAdapterSpec::default());
    harness.load(vec![Section::with_rows("S", [Node::new(1, Label::new("a"))])]);

    harness.cell(first()).bind(Some(Toggle::new("b", true).into()));

    let content = harness.host().content_views();
    let state = content[0].borrow();
    assert!(state.transitions.is_empty());
    assert_eq!(state.subviews.len(), 1);
}

#[test]
fn test_async_updates_stop_at_next_reuse() {
    let slot: SenderSlot = Rc::new(RefCell::new(None));
    let mut harness = TableHarness::new();
    harness.load(vec![Section::with_rows(
        "S",
        [Node::new(1, AsyncLabel::new("loading", &slot))],
    )]);
    let sender = slot.borrow_mut().take().expect("sender for first binding");

    let background = sender.clone();
    thread::spawn(move || background.send("ready".to_string()))
        .join()
        .expect("producer thread");
    let cell = harness.cell(first());
    assert_eq!(AsyncLabel::pump(cell.binding()), 1);
    assert_eq!(harness.label_text(first()).as_deref(), Some("ready"));

    harness.update(
        vec![Section::with_rows(
            "S",
            [Node::new(2, AsyncLabel::new("other", &slot))],
        )],
        TableViewAnimation::automatic(),
    );
    assert!(Rc::ptr_eq(&cell, &harness.cell(first())));
    assert!(!sender.send("stale".to_string()));
    assert_eq!(AsyncLabel::pump(cell.binding()), 0);
    assert_eq!(harness.label_text(first()).as_deref(), Some("other"));

    let current = slot.borrow_mut().take().expect("sender for second binding");
    assert!(current.send("late".to_string()));
    cell.binding().prepare_for_reuse();
    assert_eq!(AsyncLabel::pump(cell.binding()), 0);
    assert_eq!(harness.label_text(first()).as_deref(), Some("other"));
}
