//! Structured log events emitted by the command engine and history.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use dashgrid_layout::{
    Item, ItemPath, ItemSize, Layout, LayoutCommand, LayoutConfig, LayoutEditor, Section,
    SectionPath, Widget,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One event with every field rendered as text.
#[derive(Debug, Clone)]
struct Logged {
    level: Level,
    target: String,
    fields: BTreeMap<&'static str, String>,
}

impl Logged {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

impl Visit for Logged {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields.insert(field.name(), format!("{value:?}"));
    }
}

#[derive(Clone, Default)]
struct LogRecorder(Arc<Mutex<Vec<Logged>>>);

impl<S: Subscriber> Layer<S> for LogRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut logged = Logged {
            level: *meta.level(),
            target: meta.target().to_owned(),
            fields: BTreeMap::new(),
        };
        event.record(&mut logged);
        self.0.lock().expect("recorder lock").push(logged);
    }
}

fn record_logs(f: impl FnOnce()) -> Vec<Logged> {
    let recorder = LogRecorder::default();
    tracing::subscriber::with_default(tracing_subscriber::registry().with(recorder.clone()), f);
    recorder.0.lock().expect("recorder lock").clone()
}

fn editor() -> LayoutEditor {
    LayoutEditor::new(
        Layout::new([Section::new([
            Item::new(ItemSize::width(6), Widget::new("a", "insight")),
            Item::new(ItemSize::width(6), Widget::new("b", "insight")),
        ])]),
        LayoutConfig::default(),
    )
}

#[test]
fn rejected_command_logs_warning_with_hash() {
    let mut ed = editor();
    let expected_hash = ed.state().state_hash().to_string();
    let logs = record_logs(|| {
        let _ = ed.dispatch(&LayoutCommand::RemoveSectionItem {
            path: ItemPath::root(0, 9),
            stash: None,
        });
    });

    let warning = logs
        .iter()
        .find(|e| e.level == Level::WARN)
        .expect("rejection is logged");
    assert_eq!(warning.target, "dashgrid.command");
    assert_eq!(warning.message(), Some("layout command rejected"));
    assert_eq!(warning.field("kind"), Some("remove_section_item"));
    assert_eq!(warning.field("before_hash"), Some(expected_hash.as_str()));
}

#[test]
fn applied_command_and_history_are_logged() {
    let mut ed = editor();
    let logs = record_logs(|| {
        ed.dispatch(&LayoutCommand::AddSection {
            path: SectionPath::root(1),
            section: Section::default(),
            used_stashes: vec![],
        })
        .expect("add");
        assert!(ed.undo());
    });

    let messages: Vec<&str> = logs.iter().filter_map(Logged::message).collect();
    assert!(messages.contains(&"layout command applied"), "{messages:?}");
    assert!(messages.contains(&"history recorded"), "{messages:?}");
    assert!(messages.contains(&"history undo"), "{messages:?}");

    let applied = logs
        .iter()
        .find(|e| e.message() == Some("layout command applied"))
        .expect("applied event");
    assert_eq!(applied.field("sections"), Some("2"));
    assert_ne!(applied.field("before_hash"), applied.field("after_hash"));
    assert!(logs.iter().all(|e| e.level != Level::WARN));
}

#[test]
fn live_resize_after_undo_logs_dropped_redo() {
    let mut ed = editor();
    ed.dispatch(&LayoutCommand::AddSection {
        path: SectionPath::root(1),
        section: Section::default(),
        used_stashes: vec![],
    })
    .expect("add");
    assert!(ed.undo());

    let logs = record_logs(|| {
        ed.dispatch(&LayoutCommand::ChangeItemWidth {
            path: ItemPath::root(0, 0),
            grid_width: 4,
        })
        .expect("resize");
    });

    let cleared = logs
        .iter()
        .find(|e| e.message() == Some("redo cleared"))
        .expect("redo clear is logged");
    assert_eq!(cleared.target, "dashgrid.history");
    assert_eq!(cleared.field("dropped"), Some("1"));
}
