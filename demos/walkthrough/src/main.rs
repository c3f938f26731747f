//! Walkthrough Demo
//!
//! Moves focus through a small settings dialog and prints what a screen
//! reader would speak and show on a braille display at each step.
//!
//! Set `RUST_LOG=earshot_output=trace` to follow the rendering.

use earshot_core::{AccessTree, EventKind, NodeSpec, NodeTree, Range};
use earshot_output::{EarconLog, EarconSink, Formatter, Recorder, Rendered, Sinks};
use earshot_rules::{MessageCatalog, RuleSet};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DIALOG: &str = r#"#![enable(implicit_some)]
(
    role: "window",
    attributes: {"name": "Settings"},
    children: [
        (
            role: "dialog",
            attributes: {"name": "Network"},
            children: [
                (role: "checkBox", attributes: {"name": "Wi-Fi"}, state: {"checked": true},
                    location: (left: 10, top: 10, width: 120, height: 20)),
                (role: "list", children: [
                    (role: "listItem", attributes: {"name": "Home"},
                        location: (left: 10, top: 40, width: 120, height: 20)),
                    (role: "listItem", attributes: {"name": "Office"},
                        location: (left: 10, top: 60, width: 120, height: 20)),
                ]),
                (role: "textField", attributes: {"name": "Password", "value": "hunter2",
                    "textSelStart": 2, "textSelEnd": 4},
                    location: (left: 10, top: 90, width: 200, height: 20)),
                (role: "button", attributes: {"name": "Connect"},
                    location: (left: 10, top: 120, width: 80, height: 24)),
            ],
        ),
    ],
)"#;

fn show(title: &str, rendered: &Rendered, earcons: &Arc<EarconLog>) {
    let mut speech = Recorder::new();
    let mut display = Recorder::new();
    let mut highlight = Recorder::new();
    let sink: Arc<dyn EarconSink> = earcons.clone();
    let mut sinks = Sinks {
        speech: &mut speech,
        tactile: &mut display,
        earcons: sink,
        highlight: &mut highlight,
    };
    rendered.execute(&mut sinks, None);
    speech.play_all();

    println!("--- {} ---", title);
    for utterance in &speech.utterances {
        println!("  speak  {:?} ({:?})", utterance.text, utterance.mode);
    }
    for output in &display.tactile {
        match output.selection {
            Some(span) => println!("  braille {:?} selection {}..{}", output.text, span.start, span.end),
            None => println!("  braille {:?}", output.text),
        }
    }
    for regions in &highlight.highlights {
        if !regions.is_empty() {
            println!("  highlight {:?}", regions);
        }
    }
    if !rendered.properties.is_empty() {
        println!("  properties {:?}", rendered.properties);
    }
    println!();
}

fn main() -> earshot_output::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== Earshot Walkthrough ===\n");

    let spec: NodeSpec = ron::from_str(DIALOG)?;
    let mut tree = NodeTree::from_spec(&spec);
    let rules = RuleSet::builtin()?;
    let messages = MessageCatalog::builtin()?;
    tracing::info!(nodes = tree.len(), roles = rules.roles.len(), "definitions loaded");

    // Nodes added after the dialog opened.
    if let Some(root) = tree.root() {
        tree.add_child(root, "alert")?.set("name", "Connection lost");
    }

    let lookup = |role: &str, name: &str| tree.find_named(role, name);
    let wifi = lookup("checkBox", "Wi-Fi");
    let home = lookup("listItem", "Home");
    let office = lookup("listItem", "Office");
    let password = lookup("textField", "Password");
    let connect = lookup("button", "Connect");
    let alert = lookup("alert", "Connection lost");

    let earcons = Arc::new(EarconLog::new());
    let formatter = Formatter::new(&tree, &rules, &messages);
    let navigate = EventKind::navigate();

    // Focus walk, each step diffed against the one before.
    let mut previous: Option<Range> = None;
    for (title, node) in [
        ("Focus Wi-Fi", wifi),
        ("Focus Home", home),
        ("Focus Office", office),
        ("Focus Password", password),
        ("Focus Connect", connect),
    ] {
        let Some(node) = node else {
            continue;
        };
        let range = Range::from_node(node);
        let rendered = formatter.render(&range, previous.as_ref(), &navigate);
        show(title, &rendered, &earcons);
        previous = Some(range);
    }

    if let Some(password) = password {
        let caret = Range::text(password, 3, 3);
        let rendered = formatter.render(&caret, Some(&Range::from_node(password)), &navigate);
        show("Caret in Password", &rendered, &earcons);
    }

    if let (Some(home), Some(office)) = (home, office) {
        let rendered = formatter.render(&Range::between(home, office), None, &navigate);
        show("Read list", &rendered, &earcons);
    }

    if let Some(alert) = alert {
        let rendered = formatter.render(&Range::from_node(alert), None, &EventKind::new("alert"));
        show("Alert", &rendered, &earcons);
    }

    let rendered = formatter.apply_template("@chrome_menu_closed $earcon(OBJECT_CLOSE)");
    show("Menu closed", &rendered, &earcons);

    println!("Earcons played: {:?}", earcons.played());
    Ok(())
}
