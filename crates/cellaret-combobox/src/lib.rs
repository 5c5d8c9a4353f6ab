//! A headless typeahead combobox widget.
//!
//! This crate provides the interaction engine for a combobox: a text input
//! that simultaneously behaves as a free-text field and a filtered,
//! keyboard-navigable option list. It owns the filtering, the dropdown
//! state machine, the keyboard/pointer protocol, and the commit/cancel
//! boundary; the host owns rendering, focus management, and the committed
//! value.
//!
//! # Quick start
//!
//! ```
//! use cellaret_combobox::{Combobox, Key, KeyPressEvent, WidgetEvent};
//!
//! let mut combo = Combobox::new("grape", "Grape variety")
//!     .with_options(vec![
//!         "Riesling".to_string(),
//!         "Pinot Noir".to_string(),
//!         "Nebbiolo".to_string(),
//!     ]);
//!
//! combo.changed.connect(|value| println!("picked {value}"));
//!
//! // ArrowDown opens the list with the first option active;
//! // Enter commits it.
//! let mut down = WidgetEvent::KeyPress(KeyPressEvent::plain(Key::ArrowDown));
//! combo.event(&mut down);
//! let mut enter = WidgetEvent::KeyPress(KeyPressEvent::plain(Key::Enter));
//! combo.event(&mut enter);
//! ```
//!
//! # Interaction contract
//!
//! - Filtering is a case-insensitive substring match; an empty query shows
//!   every option. No match is a valid state, not an error.
//! - ArrowUp/ArrowDown clamp at the list ends; there is no wraparound.
//! - Keyboard focus stays on the input while the list is open; navigation
//!   moves only the active descendant.
//! - Escape discards the in-progress text and never commits.
//! - Blur commits non-empty free text that differs from the current value.
//! - Tab is left unaccepted so the host's focus order continues past the
//!   widget.
//!
//! # Feature flags
//!
//! - `accessibility` (default): AccessKit tree integration via the
//!   [`Accessible`] trait.

pub mod combobox;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod state;

#[cfg(feature = "accessibility")]
pub mod accessibility;

pub use combobox::{ComboMetrics, ComboPart, Combobox, MIN_HIT_TARGET};
pub use events::{
    EventBase, FocusInEvent, FocusOutEvent, FocusReason, Key, KeyPressEvent, KeyboardModifiers,
    PointerButton, PointerPressEvent, PointerReleaseEvent, WidgetEvent,
};
pub use filter::{OptionsModel, StringListModel};
pub use geometry::{Point, Rect, Size};
pub use state::ListState;

#[cfg(feature = "accessibility")]
pub use accessibility::{Accessible, AccessibleRole};
