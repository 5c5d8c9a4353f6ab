//! Core systems for Cellaret widgets.
//!
//! This crate provides the foundational pieces shared by Cellaret widget
//! crates:
//!
//! - **Signal/Slot System**: Type-safe notification of state changes
//! - **Errors**: The crate-level error taxonomy
//! - **Logging**: `tracing` target names for log filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use cellaret_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<String>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit("Margaux".to_string());
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id).unwrap();
//! ```

pub mod error;
pub mod logging;
pub mod signal;

pub use error::{Error, Result, SignalError};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
