//! Input event types consumed by the combobox.
//!
//! The widget is headless: the host (window shell, test harness, platform
//! adapter) translates its native input into these event structs and feeds
//! them to [`Combobox::event`](crate::Combobox::event). Events carry an
//! accepted flag; an unaccepted event propagates back to the host, which is
//! how Tab exits the widget instead of being trapped inside it.

use crate::geometry::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// Pointer buttons (mouse or synthesized from touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PointerButton {
    /// Primary button (usually left; a touch tap maps here).
    Primary = 0,
    /// Secondary button (usually right).
    Secondary = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
}

/// Common data for all widget events.
#[derive(Debug, Clone, Copy)]
pub struct EventBase {
    /// Whether the event has been accepted (handled).
    accepted: bool,
}

impl Default for EventBase {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBase {
    /// Create a new event base.
    pub fn new() -> Self {
        Self { accepted: false }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Accept the event, preventing further propagation.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Ignore the event, allowing further propagation.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// Keyboard key codes relevant to the combobox.
///
/// The structure follows web KeyboardEvent.code values. Printable input
/// travels in [`KeyPressEvent::text`], so letter and digit keys are not
/// enumerated individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Enter/Return (includes numpad Enter).
    Enter,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// A key the combobox has no special handling for.
    ///
    /// Carries the host's scancode; printable input still arrives through
    /// [`KeyPressEvent::text`].
    Unknown(u16),
}

impl Key {
    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

/// Key press event, sent when a key is pressed.
#[derive(Debug, Clone)]
pub struct KeyPressEvent {
    /// Base event data.
    pub base: EventBase,
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// The text input from this key press (if any).
    ///
    /// For printable keys, this contains the character that would be typed.
    /// For non-printable keys (modifiers, navigation, etc.), this is empty.
    pub text: String,
    /// Whether this is a key repeat event (key held down).
    pub is_repeat: bool,
}

impl KeyPressEvent {
    /// Create a new key press event.
    pub fn new(
        key: Key,
        modifiers: KeyboardModifiers,
        text: impl Into<String>,
        is_repeat: bool,
    ) -> Self {
        Self {
            base: EventBase::new(),
            key,
            modifiers,
            text: text.into(),
            is_repeat,
        }
    }

    /// Create a key press event for a non-printable key with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE, "", false)
    }
}

/// Pointer press event (mouse button down or touch start).
#[derive(Debug, Clone, Copy)]
pub struct PointerPressEvent {
    /// Base event data.
    pub base: EventBase,
    /// The button that was pressed.
    pub button: PointerButton,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl PointerPressEvent {
    /// Create a new pointer press event.
    pub fn new(button: PointerButton, local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            button,
            local_pos,
            modifiers,
        }
    }

    /// Create a primary-button press at a position with no modifiers.
    pub fn primary(local_pos: Point) -> Self {
        Self::new(PointerButton::Primary, local_pos, KeyboardModifiers::NONE)
    }
}

/// Pointer release event (mouse button up or touch end).
#[derive(Debug, Clone, Copy)]
pub struct PointerReleaseEvent {
    /// Base event data.
    pub base: EventBase,
    /// The button that was released.
    pub button: PointerButton,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
}

impl PointerReleaseEvent {
    /// Create a new pointer release event.
    pub fn new(button: PointerButton, local_pos: Point) -> Self {
        Self {
            base: EventBase::new(),
            button,
            local_pos,
        }
    }

    /// Create a primary-button release at a position.
    pub fn primary(local_pos: Point) -> Self {
        Self::new(PointerButton::Primary, local_pos)
    }
}

/// Reason for focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusReason {
    /// Focus changed due to pointer interaction.
    Pointer,
    /// Focus changed due to Tab key.
    Tab,
    /// Focus changed due to Shift+Tab (backtab).
    Backtab,
    /// Focus changed programmatically.
    #[default]
    Other,
}

/// Focus in event, sent when the input gains keyboard focus.
#[derive(Debug, Clone, Copy)]
pub struct FocusInEvent {
    /// Base event data.
    pub base: EventBase,
    /// The reason focus was gained.
    pub reason: FocusReason,
}

impl FocusInEvent {
    /// Create a new focus in event.
    pub fn new(reason: FocusReason) -> Self {
        Self {
            base: EventBase::new(),
            reason,
        }
    }
}

/// Focus out event, sent when the input loses keyboard focus.
#[derive(Debug, Clone, Copy)]
pub struct FocusOutEvent {
    /// Base event data.
    pub base: EventBase,
    /// The reason focus was lost.
    pub reason: FocusReason,
}

impl FocusOutEvent {
    /// Create a new focus out event.
    pub fn new(reason: FocusReason) -> Self {
        Self {
            base: EventBase::new(),
            reason,
        }
    }
}

/// Enumeration of all widget event types.
///
/// This allows passing events through a unified interface while preserving
/// type information for event handlers.
#[derive(Debug)]
pub enum WidgetEvent {
    /// Key press event.
    KeyPress(KeyPressEvent),
    /// Pointer press event.
    PointerPress(PointerPressEvent),
    /// Pointer release event.
    PointerRelease(PointerReleaseEvent),
    /// Focus in event.
    FocusIn(FocusInEvent),
    /// Focus out event.
    FocusOut(FocusOutEvent),
}

impl WidgetEvent {
    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::KeyPress(e) => e.base.is_accepted(),
            Self::PointerPress(e) => e.base.is_accepted(),
            Self::PointerRelease(e) => e.base.is_accepted(),
            Self::FocusIn(e) => e.base.is_accepted(),
            Self::FocusOut(e) => e.base.is_accepted(),
        }
    }

    /// Accept the event.
    pub fn accept(&mut self) {
        match self {
            Self::KeyPress(e) => e.base.accept(),
            Self::PointerPress(e) => e.base.accept(),
            Self::PointerRelease(e) => e.base.accept(),
            Self::FocusIn(e) => e.base.accept(),
            Self::FocusOut(e) => e.base.accept(),
        }
    }

    /// Ignore the event.
    pub fn ignore(&mut self) {
        match self {
            Self::KeyPress(e) => e.base.ignore(),
            Self::PointerPress(e) => e.base.ignore(),
            Self::PointerRelease(e) => e.base.ignore(),
            Self::FocusIn(e) => e.base.ignore(),
            Self::FocusOut(e) => e.base.ignore(),
        }
    }

    /// Check if this event should propagate back to the host.
    ///
    /// Input events propagate if not accepted; focus events never do.
    /// The combobox deliberately leaves Tab unaccepted so the host's focus
    /// manager advances to the next focusable element.
    pub fn should_propagate(&self) -> bool {
        match self {
            Self::KeyPress(_) | Self::PointerPress(_) | Self::PointerRelease(_) => {
                !self.is_accepted()
            }
            Self::FocusIn(_) | Self::FocusOut(_) => false,
        }
    }
}
