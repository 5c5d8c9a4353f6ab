//! Signal/slot system for Cellaret.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism for
//! widget-to-host communication. Signals are emitted by widgets when their
//! state changes, and connected slots (callbacks) are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Invocation Model
//!
//! Slots are invoked directly, in the emitting thread, before `emit`
//! returns. Cellaret widgets are single-threaded and event-driven: every
//! transition completes before the next event is processed, so there is no
//! queued or cross-thread dispatch.
//!
//! # Example
//!
//! ```
//! use cellaret_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let text_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! // Emit the signal
//! text_changed.emit("Hello, World!".to_string());
//!
//! // Disconnect when done
//! text_changed.disconnect(conn_id).unwrap();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke.
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// Signals are the core of the observer pattern in Cellaret. When a signal
/// is emitted, all connected slots are invoked with the provided arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments.
///
/// # Related Types
///
/// - [`ConnectionId`] - Returned by [`connect`](Self::connect), used to disconnect
/// - [`ConnectionGuard`] - RAII-style connection that auto-disconnects on drop
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use cellaret_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
        };
        self.connections.lock().insert(connection)
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidConnection`] if the ID was never
    /// connected or has already been disconnected.
    pub fn disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        self.connections
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or(SignalError::InvalidConnection)
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. This is useful during
    /// initialization or batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing. Slots are invoked in the
    /// current thread and have all returned by the time `emit` returns.
    #[tracing::instrument(skip_all, target = "cellaret_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "cellaret_core::signal", "signal blocked, skipping emit");
            return;
        }

        let connections = self.connections.lock();
        tracing::trace!(
            target: "cellaret_core::signal",
            connection_count = connections.len(),
            "emitting signal"
        );

        for (_, conn) in connections.iter() {
            (conn.slot)(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connection_count", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// This is useful for RAII-style connection management, ensuring connections
/// are cleaned up when the receiver goes out of scope. Created via
/// [`Signal::connect_scoped`].
///
/// # Example
///
/// ```
/// use cellaret_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);  // counter = 42
/// }
/// signal.emit(43);  // Nothing happens - connection was dropped
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args: 'static> {
    signal: *const Signal<Args>,
    id: ConnectionId,
}

impl<Args: 'static> Signal<Args> {
    /// Connect a slot with automatic disconnection when the guard is dropped.
    ///
    /// # Safety
    ///
    /// The returned guard holds a raw pointer to this signal. The signal
    /// must outlive the guard. Using `Arc<Signal<Args>>` is recommended for
    /// shared ownership.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: self as *const Signal<Args>,
            id,
        }
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        // SAFETY: The signal pointer is valid if the guard is used correctly.
        // The caller must ensure the signal outlives the guard.
        unsafe {
            if !self.signal.is_null() {
                let _ = (*self.signal).disconnect(self.id);
            }
        }
    }
}

impl<Args: 'static> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        let values = received.lock();
        assert_eq!(*values, vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id).is_ok());
        signal.emit(2);

        let values = received.lock();
        assert_eq!(*values, vec![1]); // Only received before disconnect
    }

    #[test]
    fn test_signal_disconnect_twice_fails() {
        let signal = Signal::<()>::new();
        let conn_id = signal.connect(|_| {});

        assert!(signal.disconnect(conn_id).is_ok());
        assert_eq!(
            signal.disconnect(conn_id),
            Err(SignalError::InvalidConnection)
        );
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2); // Should be ignored
        signal.set_blocked(false);
        signal.emit(3);

        let values = received.lock();
        assert_eq!(*values, vec![1, 3]);
    }

    #[test]
    fn test_multiple_connections() {
        let signal = Signal::<String>::new();
        let count = Arc::new(Mutex::new(0));

        for _ in 0..3 {
            let count_clone = count.clone();
            signal.connect(move |_| {
                *count_clone.lock() += 1;
            });
        }

        assert_eq!(signal.connection_count(), 3);
        signal.emit("test".to_string());
        assert_eq!(*count.lock(), 3);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let received_clone = received.clone();
            let _guard = signal.connect_scoped(move |&value| {
                received_clone.lock().push(value);
            });
            signal.emit(1);
        }
        signal.emit(2); // Guard dropped, nothing received

        let values = received.lock();
        assert_eq!(*values, vec![1]);
    }
}
