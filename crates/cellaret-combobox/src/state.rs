//! The selection state machine.
//!
//! The dropdown is modelled as a tagged state rather than a set of
//! booleans: [`ListState::Closed`] or [`ListState::Open`] with an optional
//! active index into the *filtered* option list. Keeping the state tagged
//! makes the clamp/reset invariants mechanically checkable:
//!
//! - whenever `active` is `Some(i)`, `i < filtered_len`
//! - every change of the filtered list resets `active` to the first option,
//!   or to `None` when the filtered list is empty
//! - opening activates the first filtered option immediately, so Enter with
//!   no prior navigation still selects it
//! - ArrowUp/ArrowDown clamp at the ends; there is no wraparound

/// State of the dropdown list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    /// The dropdown is closed; no option is active.
    #[default]
    Closed,
    /// The dropdown is open.
    Open {
        /// Index of the active (highlighted) option in the filtered list,
        /// or `None` when the filtered list is empty.
        active: Option<usize>,
    },
}

impl ListState {
    /// Check whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// The active option index, if the dropdown is open and non-empty.
    pub fn active(&self) -> Option<usize> {
        match self {
            Self::Closed => None,
            Self::Open { active } => *active,
        }
    }

    /// Open the dropdown over a filtered list of `len` options.
    ///
    /// The first option becomes active immediately; an empty list opens
    /// with no active option.
    pub fn open(&mut self, len: usize) {
        *self = Self::Open {
            active: if len > 0 { Some(0) } else { None },
        };
    }

    /// Close the dropdown.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Move the active option down by one, clamping at the last index.
    ///
    /// Does nothing when closed or when the filtered list is empty.
    pub fn move_down(&mut self, len: usize) {
        if let Self::Open { active: Some(i) } = self
            && *i + 1 < len
        {
            *i += 1;
        }
    }

    /// Move the active option up by one, clamping at index 0.
    pub fn move_up(&mut self) {
        if let Self::Open { active: Some(i) } = self
            && *i > 0
        {
            *i -= 1;
        }
    }

    /// Activate the first option.
    pub fn select_first(&mut self, len: usize) {
        if self.is_open() {
            self.open(len);
        }
    }

    /// Activate the last option.
    pub fn select_last(&mut self, len: usize) {
        if self.is_open() {
            *self = Self::Open {
                active: len.checked_sub(1),
            };
        }
    }

    /// Set the active option directly (pointer hover over an option).
    ///
    /// Out-of-bounds indices are ignored.
    pub fn set_active(&mut self, index: usize, len: usize) {
        if self.is_open() && index < len {
            *self = Self::Open {
                active: Some(index),
            };
        }
    }

    /// Re-establish the invariants after the filtered list changed.
    ///
    /// The active index resets to the first option of the new list, or to
    /// `None` when it is empty. A closed dropdown stays closed. Never
    /// panics, even when the new list is shorter than the old one.
    pub fn reset_for_len(&mut self, len: usize) {
        if self.is_open() {
            self.open(len);
        }
    }
}
