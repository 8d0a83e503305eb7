use std::cell::RefCell;
use std::rc::Rc;

use tabula_core::{Form, Node, Section};

use crate::components::{ReminderRow, Reminders, SectionTitle, SwitchRow, TextRow};

pub type SettingsForm = Form<&'static str, String>;

/// App state rendered into a settings form.
pub struct Settings {
    pub wifi: bool,
    pub airplane_mode: bool,
    pub networks: Vec<String>,
    pub reminders: Reminders,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self {
            wifi: true,
            airplane_mode: false,
            networks: vec!["home".into(), "office".into(), "cafe".into()],
            reminders: Rc::new(RefCell::new(vec![
                "water the plants".into(),
                "call the bank".into(),
                "renew the passport before the summer trip".into(),
            ])),
        }
    }

    pub fn form(&self) -> SettingsForm {
        let wifi_available = !self.airplane_mode;
        let mut network = Section::new("network")
            .header(SectionTitle("Network".into()))
            .row(
                "airplane".into(),
                SwitchRow::new("Airplane mode", self.airplane_mode),
            )
            .row(
                "wifi".into(),
                SwitchRow::new("Wi-Fi", self.wifi && wifi_available).enabled(wifi_available),
            );
        if self.wifi && wifi_available {
            network = network.nodes(
                self.networks
                    .iter()
                    .map(|name| Node::new(format!("net:{name}"), TextRow::new(name.as_str()))),
            );
        }

        let reminders = Section::new("reminders")
            .header(SectionTitle("Reminders".into()))
            .footer(TextRow::new("Swipe a reminder to complete it."))
            .nodes(self.reminders.borrow().iter().map(|title| {
                Node::new(
                    format!("todo:{title}"),
                    ReminderRow::new(title.as_str(), &self.reminders),
                )
            }));

        let mut form = Form::new();
        if self.airplane_mode {
            form = form.section(reminders).section(network);
        } else {
            form = form.section(network).section(reminders);
        }
        form
    }
}
