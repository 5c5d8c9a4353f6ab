//! Logging facilities for Cellaret.
//!
//! Cellaret uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Widget transitions are logged at `debug` level and signal emission at
//! `trace` level, so a directive such as
//! `RUST_LOG=cellaret_combobox=debug,cellaret_core::signal=trace` surfaces
//! the full interaction history of a widget.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "cellaret_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "cellaret_core::signal";
    /// Combobox widget target.
    pub const COMBOBOX: &str = "cellaret_combobox";
}
