//! Headless combobox walkthrough.
//!
//! Drives a combobox through a typical session — typing, keyboard
//! navigation, committing, cancelling — with no window or renderer
//! attached, printing the widget state after each step.
//!
//! Run with: cargo run -p cellaret-combobox --example grape_varieties

use std::sync::Arc;

use parking_lot::Mutex;

use cellaret_combobox::{Combobox, Key, KeyPressEvent, KeyboardModifiers, WidgetEvent};

fn send_key(combo: &mut Combobox, key: Key) {
    let mut event = WidgetEvent::KeyPress(KeyPressEvent::plain(key));
    combo.event(&mut event);
}

fn type_text(combo: &mut Combobox, text: &str) {
    for ch in text.chars() {
        let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(
            Key::Unknown(0),
            KeyboardModifiers::NONE,
            ch.to_string(),
            false,
        ));
        combo.event(&mut event);
    }
}

fn report(step: &str, combo: &Combobox) {
    println!(
        "{step:<28} display={:?} open={} active={:?} matches={}",
        combo.display_text(),
        combo.is_open(),
        combo.active_text(),
        combo.filtered_len(),
    );
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut combo = Combobox::new("grape", "Grape variety").with_options(
        [
            "Cabernet Sauvignon",
            "Grenache",
            "Nebbiolo",
            "Pinot Noir",
            "Pinotage",
            "Riesling",
            "Sangiovese",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    );

    // The host owns the committed value and applies commits back.
    let committed = Arc::new(Mutex::new(String::new()));
    let committed_clone = committed.clone();
    combo.changed.connect(move |value: &String| {
        println!("  -> changed({value:?})");
        *committed_clone.lock() = value.clone();
    });

    println!("Grape variety combobox");
    println!("======================");
    println!();
    report("initial", &combo);

    // ArrowDown opens with the first option active
    send_key(&mut combo, Key::ArrowDown);
    report("ArrowDown (opens)", &combo);

    // Typing narrows the list and keeps it open
    type_text(&mut combo, "pinot");
    report("typed \"pinot\"", &combo);

    send_key(&mut combo, Key::ArrowDown);
    report("ArrowDown", &combo);

    // Enter commits the active option's exact string
    send_key(&mut combo, Key::Enter);
    combo.set_value(committed.lock().clone());
    report("Enter (commits)", &combo);

    // Escape throws away an edit in progress
    type_text(&mut combo, "xyz");
    report("typed \"xyz\"", &combo);
    send_key(&mut combo, Key::Escape);
    report("Escape (cancels)", &combo);

    println!();
    println!("Committed value: {:?}", committed.lock());
}
