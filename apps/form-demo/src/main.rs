mod app;
mod components;
mod console;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{ensure, Context};
use tabula_core::{IndexPath, MenuAction, Size, ViewRef};
use tabula_foundation::ReuseStats;
use tabula_ui::{ReusableView, TableAdapter, TableAdapterSpec, TableViewAnimation};

use crate::app::Settings;
use crate::components::{SwitchView, TextView};
use crate::console::ConsoleHost;

type Adapter = TableAdapter<&'static str, String>;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();

    let host = Rc::new(RefCell::new(ConsoleHost::new(Size::new(375.0, 667.0))));
    let mut adapter = Adapter::new(TableAdapterSpec::default());
    adapter.attach(&host);

    let mut settings = Settings::new();

    println!("initial form");
    adapter.update(settings.form().into_sections(), TableViewAnimation::automatic());
    render(&mut adapter, &host)?;

    println!("\nturn off wi-fi");
    settings.wifi = false;
    adapter.update(settings.form().into_sections(), TableViewAnimation::automatic());
    render(&mut adapter, &host)?;

    println!("\nenable airplane mode");
    settings.airplane_mode = true;
    adapter.update(settings.form().into_sections(), TableViewAnimation::fade());
    render(&mut adapter, &host)?;

    let reminders = adapter
        .sections()
        .iter()
        .position(|section| section.id == "reminders")
        .context("reminders section missing")?;
    let first = IndexPath::new(reminders, 0);

    println!("\nlong press {first}");
    let menu = adapter.should_show_menu(first).unwrap_or_default();
    for item in &menu {
        println!("  menu item {:?}", item.title);
    }
    ensure!(
        adapter.perform_action(first, &MenuAction::copy()),
        "reminder did not respond to copy"
    );

    println!("\nswipe {first}");
    for action in adapter.trailing_swipe_actions(first) {
        println!("  action {:?} ({:?})", action.title, action.style);
    }
    let remaining = settings.reminders.borrow().len();
    ensure!(adapter.delete_row(first), "reminder could not be deleted");
    ensure!(
        settings.reminders.borrow().len() == remaining - 1,
        "deleted reminder still in the app state"
    );
    adapter.update(settings.form().into_sections(), TableViewAnimation::automatic());
    render(&mut adapter, &host)?;

    println!("\nfull reload");
    settings.airplane_mode = false;
    settings.wifi = true;
    adapter.update(settings.form().into_sections(), TableViewAnimation::none());
    render(&mut adapter, &host)?;

    let focus = adapter.next_focusable(IndexPath::new(0, 0));
    println!("\nfocus after [0, 0]: {focus:?}");
    print_stats("cells", adapter.reuse_stats());
    print_stats("supplements", adapter.supplement_reuse_stats());
    println!("host received {} updates", host.borrow().updates());
    Ok(())
}

/// Lays the whole list out once, the way a list control scrolling through
/// it would, handing every view back for reuse afterwards.
fn render(adapter: &mut Adapter, host: &Rc<RefCell<ConsoleHost>>) -> anyhow::Result<()> {
    let host = host.borrow();
    for section in 0..adapter.number_of_sections() {
        if let Some(header) = adapter.view_for_header(&*host, section) {
            let height = adapter.height_for_header(&*host, section);
            println!("  {} ({height}pt)", describe(header.contained_view())?);
            adapter.enqueue_reusable_supplement(header);
        }
        for row in 0..adapter.number_of_rows(section) {
            let path = IndexPath::new(section, row);
            let cell = adapter.cell_for_row(&*host, path);
            let height = adapter.height_for_row(&*host, path);
            println!("    {path} {} ({height}pt)", describe(cell.contained_view())?);
            adapter.will_display_cell(&cell, path);
            adapter.did_end_displaying_cell(&cell, path);
            adapter.enqueue_reusable_cell(cell);
        }
        if let Some(footer) = adapter.view_for_footer(&*host, section) {
            let height = adapter.height_for_footer(&*host, section);
            println!("  {} ({height}pt)", describe(footer.contained_view())?);
            adapter.enqueue_reusable_supplement(footer);
        }
    }
    Ok(())
}

fn describe(view: Option<ViewRef>) -> anyhow::Result<String> {
    let view = view.context("container has no content")?;
    if let Some(text) = view.as_any().downcast_ref::<TextView>() {
        return Ok(text.text());
    }
    view.as_any()
        .downcast_ref::<SwitchView>()
        .map(SwitchView::describe)
        .context("unexpected view type")
}

fn print_stats(label: &str, stats: &ReuseStats) {
    println!(
        "{label}: {} created, {} reused, {} pooled",
        stats.total_created, stats.reuse_count, stats.views_in_pool
    );
}
