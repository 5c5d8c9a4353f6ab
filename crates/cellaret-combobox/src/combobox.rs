//! The combobox widget.
//!
//! A text field that simultaneously behaves as a free-text input and a
//! filtered, keyboard-navigable selection list. The option list is a set of
//! suggestions, not an enumeration constraint: values outside the list are
//! committed as free text.
//!
//! The widget is controlled: the committed value is owned by the host and
//! only ever changes through the [`changed`](Combobox::changed) signal. The
//! widget itself never writes it; the host reacts to `changed` by calling
//! [`set_value`](Combobox::set_value).
//!
//! # Example
//!
//! ```
//! use cellaret_combobox::{Combobox, StringListModel};
//!
//! let mut combo = Combobox::new("grape", "Grape variety")
//!     .with_model(Box::new(StringListModel::from([
//!         "Riesling", "Pinot Noir", "Nebbiolo",
//!     ])))
//!     .with_placeholder("Start typing...");
//!
//! combo.changed.connect(|value| {
//!     println!("Committed: {}", value);
//! });
//!
//! combo.open_list();
//! assert_eq!(combo.active_text(), Some("Riesling".to_string()));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use cellaret_core::Signal;
use unicode_segmentation::UnicodeSegmentation;

use crate::events::{
    FocusInEvent, FocusOutEvent, Key, KeyPressEvent, PointerButton, PointerPressEvent,
    PointerReleaseEvent, WidgetEvent,
};
use crate::filter::{OptionsModel, StringListModel};
use crate::geometry::{Point, Rect};
use crate::state::ListState;

/// Minimum interactive hit-target edge, in logical pixels.
///
/// Applied uniformly to the input row, the toggle button, and every option
/// row so touch interaction always has a full-size target.
pub const MIN_HIT_TARGET: f32 = 44.0;

/// Monotonic widget instance counter, used to derive accessibility node IDs.
static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Parts of the combobox for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComboPart {
    /// Outside every interactive part of the widget.
    #[default]
    Outside,
    /// The text input area.
    Input,
    /// The toggle button that opens/closes the list.
    Toggle,
    /// An option row in the open list; the index is into the filtered list.
    Option(usize),
    /// The non-interactive "no matching options" row.
    Notice,
}

/// Layout metrics for hit testing and accessibility bounds.
///
/// All interactive dimensions are clamped to [`MIN_HIT_TARGET`].
#[derive(Debug, Clone, Copy)]
pub struct ComboMetrics {
    /// Total widget width.
    pub width: f32,
    /// Height of the input row.
    pub input_height: f32,
    /// Width of the toggle button at the right edge of the input row.
    pub toggle_width: f32,
    /// Height of each option row.
    pub item_height: f32,
}

impl Default for ComboMetrics {
    fn default() -> Self {
        Self {
            width: 280.0,
            input_height: MIN_HIT_TARGET,
            toggle_width: MIN_HIT_TARGET,
            item_height: MIN_HIT_TARGET,
        }
    }
}

impl ComboMetrics {
    /// Clamp all interactive dimensions to the minimum hit target.
    fn clamped(mut self) -> Self {
        self.input_height = self.input_height.max(MIN_HIT_TARGET);
        self.toggle_width = self.toggle_width.max(MIN_HIT_TARGET);
        self.item_height = self.item_height.max(MIN_HIT_TARGET);
        self.width = self.width.max(self.toggle_width);
        self
    }
}

/// A typeahead combobox over a list of string suggestions.
///
/// # Features
///
/// - Case-insensitive substring filtering as the user types
/// - Clamped keyboard navigation (no wraparound), Home/End, open-on-ArrowDown
/// - Free-text commits: the list suggests, it does not constrain
/// - Escape cancels without committing and re-requests input focus
/// - Tab leaves the event unaccepted so the host focus manager moves on
/// - Accessibility tree via [`Accessible`](crate::Accessible) (default feature)
///
/// # Signals
///
/// - `changed(String)`: a value was committed — exactly once per commit,
///   never per keystroke
/// - `query_changed(String)`: the in-progress query text changed
/// - `opened()` / `closed()`: the dropdown opened or closed
/// - `active_changed(Option<String>)`: the highlighted option changed
/// - `focus_requested()`: the widget asks the host to put keyboard focus on
///   the text input (Escape, toggle-open)
pub struct Combobox {
    /// Host-supplied identifier for label/description association.
    id: String,
    /// Visible label text.
    label: String,
    /// The committed value. Controlled: mutated only via [`set_value`](Self::set_value).
    value: String,
    /// In-progress typed text. Empty means "not editing"; the displayed
    /// text then falls back to the committed value.
    query: String,
    /// Byte offset of the edit cursor within `query`.
    cursor_pos: usize,
    /// The suggestion source.
    model: Box<dyn OptionsModel>,
    /// Indices into the model matching the current query, in model order.
    filtered: Vec<usize>,
    /// Dropdown state.
    state: ListState,
    /// Scroll offset into the filtered list, in rows.
    scroll_offset: usize,
    /// Maximum option rows shown at once.
    max_visible_items: usize,
    /// Placeholder text shown when both query and value are empty.
    placeholder: String,
    /// Whether the field is required.
    required: bool,
    /// Host-supplied validation message. Opaque: rendered and announced,
    /// never interpreted.
    error: Option<String>,
    /// Layout metrics.
    metrics: ComboMetrics,
    /// Whether the input currently has keyboard focus.
    has_focus: bool,
    /// Arbitration flag for the blur-vs-toggle race: raised on toggle
    /// pointer-press, dropped on release. While up, the generic blur-commit
    /// path is skipped so a toggle click cannot double-commit.
    toggle_press_guard: bool,
    /// Base for accessibility node IDs, unique per instance.
    instance: u64,

    // Signals
    /// Emitted when a value is committed (option pick, Enter, or blur with
    /// free text). Exactly once per commit.
    pub changed: Signal<String>,
    /// Emitted when the in-progress query text changes.
    pub query_changed: Signal<String>,
    /// Emitted when the dropdown opens.
    pub opened: Signal<()>,
    /// Emitted when the dropdown closes.
    pub closed: Signal<()>,
    /// Emitted when the active (highlighted) option changes.
    pub active_changed: Signal<Option<String>>,
    /// Emitted when the widget wants keyboard focus back on the input.
    pub focus_requested: Signal<()>,
}

impl Combobox {
    /// Create a new combobox with an empty option list.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: String::new(),
            query: String::new(),
            cursor_pos: 0,
            model: Box::new(StringListModel::empty()),
            filtered: Vec::new(),
            state: ListState::Closed,
            scroll_offset: 0,
            max_visible_items: 7,
            placeholder: String::new(),
            required: false,
            error: None,
            metrics: ComboMetrics::default(),
            has_focus: false,
            toggle_press_guard: false,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            changed: Signal::new(),
            query_changed: Signal::new(),
            opened: Signal::new(),
            closed: Signal::new(),
            active_changed: Signal::new(),
            focus_requested: Signal::new(),
        }
    }

    // =========================================================================
    // Model
    // =========================================================================

    /// Set the suggestion source.
    ///
    /// Re-reads the options against the current query. Safe to call while
    /// the dropdown is open: the query is preserved and the active index is
    /// reset to the first option of the new filtered list (or none).
    pub fn set_model(&mut self, model: Box<dyn OptionsModel>) {
        self.model = model;
        self.refilter();
    }

    /// Set the model using builder pattern.
    pub fn with_model(mut self, model: Box<dyn OptionsModel>) -> Self {
        self.set_model(model);
        self
    }

    /// Replace the option list with plain strings.
    ///
    /// Option identity is not assumed stable across calls.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.set_model(Box::new(StringListModel::new(options)));
    }

    /// Set options using builder pattern.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.set_options(options);
        self
    }

    /// Get the number of options before filtering.
    pub fn option_count(&self) -> usize {
        self.model.row_count()
    }

    // =========================================================================
    // Value and query
    // =========================================================================

    /// Get the committed value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the committed value (controlled-component contract).
    ///
    /// Called by the host, typically in response to [`changed`](Self::changed).
    /// An in-progress query is deliberately left untouched so an external
    /// value change never clobbers what the user is typing.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Set the value using builder pattern.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Get the in-progress query text. Empty when not editing.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The text the input currently displays: the query while editing,
    /// otherwise the committed value.
    pub fn display_text(&self) -> &str {
        if self.query.is_empty() {
            &self.value
        } else {
            &self.query
        }
    }

    // =========================================================================
    // Field chrome
    // =========================================================================

    /// Get the host-supplied identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, text: impl Into<String>) {
        self.placeholder = text.into();
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Whether the field is required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Set whether the field is required.
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Set required using builder pattern.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Get the host-supplied validation message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set or clear the validation message. The widget renders and
    /// announces it; it never interprets it.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Set the validation message using builder pattern.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Get the layout metrics.
    pub fn metrics(&self) -> ComboMetrics {
        self.metrics
    }

    /// Set the layout metrics. Interactive dimensions are clamped to
    /// [`MIN_HIT_TARGET`].
    pub fn set_metrics(&mut self, metrics: ComboMetrics) {
        self.metrics = metrics.clamped();
    }

    /// Set metrics using builder pattern.
    pub fn with_metrics(mut self, metrics: ComboMetrics) -> Self {
        self.set_metrics(metrics);
        self
    }

    /// Get the maximum number of visible option rows.
    pub fn max_visible_items(&self) -> usize {
        self.max_visible_items
    }

    /// Set the maximum number of visible option rows.
    pub fn set_max_visible_items(&mut self, count: usize) {
        self.max_visible_items = count.max(1);
    }

    /// Set max visible items using builder pattern.
    pub fn with_max_visible_items(mut self, count: usize) -> Self {
        self.set_max_visible_items(count);
        self
    }

    /// Whether the input currently has keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Per-instance base for accessibility node IDs.
    pub(crate) fn instance(&self) -> u64 {
        self.instance
    }

    // =========================================================================
    // Filtered list
    // =========================================================================

    /// Indices of the options matching the current query, in model order.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    /// Number of options matching the current query.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Texts of the options matching the current query.
    pub fn filtered_texts(&self) -> Vec<String> {
        self.filtered
            .iter()
            .filter_map(|&i| self.model.text(i))
            .collect()
    }

    /// Text of the filtered option at `index`, if any.
    pub fn filtered_text(&self, index: usize) -> Option<String> {
        self.filtered.get(index).and_then(|&i| self.model.text(i))
    }

    /// Recompute the filtered list from the current query and re-establish
    /// the active-index invariant. Idempotent and panic-free even when the
    /// option list shrank underneath an open dropdown.
    fn refilter(&mut self) {
        self.filtered = self.model.filter(&self.query);
        self.state.reset_for_len(self.filtered.len());
        self.scroll_offset = 0;
        if self.state.is_open() {
            self.emit_active_changed();
        }
    }

    // =========================================================================
    // Dropdown state
    // =========================================================================

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Index of the active option in the filtered list, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.state.active()
    }

    /// Text of the active option, if any.
    pub fn active_text(&self) -> Option<String> {
        self.active_index().and_then(|i| self.filtered_text(i))
    }

    /// Open the dropdown.
    ///
    /// The filter is recomputed and the first filtered option becomes
    /// active immediately, so Enter with no prior navigation selects it.
    /// No-op when already open.
    pub fn open_list(&mut self) {
        if self.state.is_open() {
            return;
        }
        self.filtered = self.model.filter(&self.query);
        self.scroll_offset = 0;
        self.state.open(self.filtered.len());
        tracing::debug!(
            target: "cellaret_combobox",
            id = %self.id,
            matches = self.filtered.len(),
            "dropdown opened"
        );
        self.opened.emit(());
        self.emit_active_changed();
    }

    /// Close the dropdown without touching the query or the value.
    pub fn close_list(&mut self) {
        if !self.state.is_open() {
            return;
        }
        self.state.close();
        self.scroll_offset = 0;
        tracing::debug!(target: "cellaret_combobox", id = %self.id, "dropdown closed");
        self.closed.emit(());
    }

    /// Toggle the dropdown.
    pub fn toggle_list(&mut self) {
        if self.state.is_open() {
            self.close_list();
        } else {
            self.open_list();
        }
    }

    fn emit_active_changed(&self) {
        self.active_changed.emit(self.active_text());
    }

    /// Scroll so the active option is within the visible window.
    fn ensure_active_visible(&mut self) {
        let Some(idx) = self.state.active() else {
            return;
        };
        if idx < self.scroll_offset {
            self.scroll_offset = idx;
        } else if idx >= self.scroll_offset + self.max_visible_items {
            self.scroll_offset = idx - self.max_visible_items + 1;
        }
    }

    /// The range of filtered indices currently scrolled into view.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = self.scroll_offset;
        let end = (start + self.max_visible_items).min(self.filtered.len());
        start..end
    }

    // =========================================================================
    // Commit/cancel boundary
    // =========================================================================
    //
    // The only paths allowed to emit `changed`. Every commit or cancel
    // clears the query, so the displayed text is driven purely by the
    // committed value until the user types again.

    /// Commit the filtered option at `index`: emits `changed` with the
    /// option's exact string, clears the query, and closes the dropdown.
    fn commit_option(&mut self, index: usize) {
        let Some(text) = self.filtered_text(index) else {
            return;
        };
        tracing::debug!(target: "cellaret_combobox", id = %self.id, value = %text, "option committed");
        self.clear_query();
        self.close_list();
        self.changed.emit(text);
    }

    /// Commit the query as free text if it is non-empty and differs from
    /// the committed value. The option list is a set of suggestions, not an
    /// enumeration constraint.
    fn commit_free_text(&mut self) {
        let text = std::mem::take(&mut self.query);
        self.cursor_pos = 0;
        self.close_list();
        if !text.is_empty() && text != self.value {
            tracing::debug!(target: "cellaret_combobox", id = %self.id, value = %text, "free text committed");
            self.changed.emit(text);
        }
    }

    /// Discard the query without committing and close the dropdown.
    fn cancel(&mut self) {
        self.clear_query();
        self.close_list();
        tracing::debug!(target: "cellaret_combobox", id = %self.id, "edit cancelled");
    }

    fn clear_query(&mut self) {
        self.query.clear();
        self.cursor_pos = 0;
    }

    // =========================================================================
    // Query editing
    // =========================================================================

    /// Start an edit session from the displayed text if none is active.
    ///
    /// The input shows the committed value while the query is empty, so the
    /// first editing keystroke operates on that text, cursor at the end.
    fn ensure_editing(&mut self) {
        if self.query.is_empty() && !self.value.is_empty() {
            self.query = self.value.clone();
            self.cursor_pos = self.query.len();
        }
    }

    /// Apply a query mutation: refilter, reset the active index, make sure
    /// the dropdown is open, and notify.
    fn query_edited(&mut self) {
        let was_open = self.state.is_open();
        self.filtered = self.model.filter(&self.query);
        self.scroll_offset = 0;
        if was_open {
            self.state.reset_for_len(self.filtered.len());
        } else {
            self.state.open(self.filtered.len());
            self.opened.emit(());
        }
        self.query_changed.emit(self.query.clone());
        self.emit_active_changed();
    }

    /// Insert typed text at the cursor.
    fn insert_text(&mut self, text: &str) {
        self.ensure_editing(); // editing starts from the displayed text
        self.query.insert_str(self.cursor_pos, text);
        self.cursor_pos += text.len();
        self.query_edited();
    }

    /// Delete the grapheme before the cursor.
    fn delete_backward(&mut self) {
        self.ensure_editing();
        if self.cursor_pos == 0 {
            return;
        }
        let start = self.query[..self.cursor_pos]
            .grapheme_indices(true)
            .last()
            .map_or(0, |(i, _)| i);
        self.query.replace_range(start..self.cursor_pos, "");
        self.cursor_pos = start;
        self.query_edited();
    }

    /// Delete the grapheme after the cursor.
    fn delete_forward(&mut self) {
        self.ensure_editing();
        if self.cursor_pos >= self.query.len() {
            return;
        }
        let end = self.query[self.cursor_pos..]
            .graphemes(true)
            .next()
            .map_or(self.query.len(), |g| self.cursor_pos + g.len());
        self.query.replace_range(self.cursor_pos..end, "");
        self.query_edited();
    }

    // =========================================================================
    // Geometry and hit testing
    // =========================================================================

    /// The input row rectangle (excluding the toggle button).
    pub fn input_rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.metrics.width - self.metrics.toggle_width,
            self.metrics.input_height,
        )
    }

    /// The toggle button rectangle.
    pub fn toggle_rect(&self) -> Rect {
        Rect::new(
            self.metrics.width - self.metrics.toggle_width,
            0.0,
            self.metrics.toggle_width,
            self.metrics.input_height,
        )
    }

    /// The popup rectangle below the input. Zero-height when closed; one
    /// notice row high when open with no matches.
    pub fn popup_rect(&self) -> Rect {
        if !self.state.is_open() {
            return Rect::new(0.0, self.metrics.input_height, self.metrics.width, 0.0);
        }
        let rows = self.filtered.len().clamp(1, self.max_visible_items);
        Rect::new(
            0.0,
            self.metrics.input_height,
            self.metrics.width,
            rows as f32 * self.metrics.item_height,
        )
    }

    /// The rectangle of the visible option row at `visual_idx` rows below
    /// the top of the popup.
    fn row_rect(&self, visual_idx: usize) -> Rect {
        Rect::new(
            0.0,
            self.metrics.input_height + visual_idx as f32 * self.metrics.item_height,
            self.metrics.width,
            self.metrics.item_height,
        )
    }

    /// The rectangle of the filtered option at `index`, if it is scrolled
    /// into view.
    pub fn option_rect(&self, index: usize) -> Option<Rect> {
        if !self.state.is_open() || !self.visible_range().contains(&index) {
            return None;
        }
        Some(self.row_rect(index - self.scroll_offset))
    }

    /// Hit-test a widget-local position into a part.
    pub fn hit_test(&self, pos: Point) -> ComboPart {
        if self.toggle_rect().contains(pos) {
            return ComboPart::Toggle;
        }
        if self.input_rect().contains(pos) {
            return ComboPart::Input;
        }
        if self.state.is_open() {
            let popup = self.popup_rect();
            if popup.contains(pos) {
                if self.filtered.is_empty() {
                    return ComboPart::Notice;
                }
                let row = ((pos.y - popup.origin.y) / self.metrics.item_height) as usize;
                let index = row + self.scroll_offset;
                if index < self.filtered.len() {
                    return ComboPart::Option(index);
                }
            }
        }
        ComboPart::Outside
    }

    // =========================================================================
    // Event handlers
    // =========================================================================

    fn handle_key_press(&mut self, event: &KeyPressEvent) -> bool {
        match event.key {
            Key::Escape => {
                // Never commits, regardless of the active option.
                if self.state.is_open() || !self.query.is_empty() {
                    self.cancel();
                    // Re-assert input focus in case a pointer interaction
                    // had moved it.
                    self.focus_requested.emit(());
                    return true;
                }
                false
            }
            Key::Enter => {
                if let Some(active) = self.state.active() {
                    self.commit_option(active);
                    return true;
                }
                if !self.query.is_empty() {
                    // Open with no match (or closed mid-edit): the free-text
                    // commit applies immediately rather than waiting for blur.
                    self.commit_free_text();
                    return true;
                }
                if self.state.is_open() {
                    self.close_list();
                    return true;
                }
                false
            }
            Key::ArrowDown => {
                if self.state.is_open() {
                    self.state.move_down(self.filtered.len());
                    self.ensure_active_visible();
                    self.emit_active_changed();
                } else {
                    self.open_list();
                }
                true
            }
            Key::ArrowUp => {
                if self.state.is_open() {
                    self.state.move_up();
                    self.ensure_active_visible();
                    self.emit_active_changed();
                } else {
                    self.open_list();
                }
                true
            }
            Key::Home => {
                if self.state.is_open() {
                    self.state.select_first(self.filtered.len());
                    self.scroll_offset = 0;
                    self.emit_active_changed();
                    true
                } else {
                    self.cursor_pos = 0;
                    !self.query.is_empty()
                }
            }
            Key::End => {
                if self.state.is_open() {
                    self.state.select_last(self.filtered.len());
                    self.ensure_active_visible();
                    self.emit_active_changed();
                    true
                } else {
                    self.cursor_pos = self.query.len();
                    !self.query.is_empty()
                }
            }
            Key::Tab => {
                // Tab exits the widget entirely; the list closes and the
                // event stays unaccepted so the host focus manager advances.
                // The query survives until the focus-out commit decision.
                self.close_list();
                false
            }
            Key::Backspace => {
                self.delete_backward();
                true
            }
            Key::Delete => {
                self.delete_forward();
                true
            }
            _ => {
                if !event.text.is_empty()
                    && !event.modifiers.control
                    && !event.modifiers.meta
                    && !event.text.chars().any(char::is_control)
                {
                    self.insert_text(&event.text);
                    return true;
                }
                false
            }
        }
    }

    fn handle_pointer_press(&mut self, event: &PointerPressEvent) -> bool {
        if event.button != PointerButton::Primary {
            return false;
        }

        match self.hit_test(event.local_pos) {
            ComboPart::Toggle => {
                // Raise the arbitration flag before anything else: the
                // press may pull focus off the input and the resulting
                // focus-out must not run the blur-commit path.
                self.toggle_press_guard = true;
                let opening = !self.state.is_open();
                self.toggle_list();
                if opening {
                    // Opening via the toggle must not steal focus from the
                    // input.
                    self.focus_requested.emit(());
                }
                true
            }
            ComboPart::Input => {
                self.cursor_pos = self.query.len();
                true
            }
            ComboPart::Option(index) => {
                // Commits the option's exact string synchronously.
                self.commit_option(index);
                true
            }
            ComboPart::Notice => true,
            ComboPart::Outside => {
                if self.state.is_open() {
                    // Routed through the commit boundary, not discarded.
                    self.commit_free_text();
                    true
                } else {
                    false
                }
            }
        }
    }

    fn handle_pointer_release(&mut self, _event: &PointerReleaseEvent) -> bool {
        self.toggle_press_guard = false;
        false
    }

    fn handle_focus_in(&mut self, _event: &FocusInEvent) -> bool {
        self.has_focus = true;
        false
    }

    fn handle_focus_out(&mut self, _event: &FocusOutEvent) -> bool {
        self.has_focus = false;
        if self.toggle_press_guard {
            // The toggle button took the focus for this tick; the commit
            // decision belongs to the toggle handler, not to blur.
            return false;
        }
        self.commit_free_text();
        false
    }

    /// Process a widget event. Returns `true` when the event was handled;
    /// handled input events are marked accepted.
    pub fn event(&mut self, event: &mut WidgetEvent) -> bool {
        let handled = match event {
            WidgetEvent::KeyPress(e) => {
                let e = e.clone();
                self.handle_key_press(&e)
            }
            WidgetEvent::PointerPress(e) => {
                let e = *e;
                self.handle_pointer_press(&e)
            }
            WidgetEvent::PointerRelease(e) => {
                let e = *e;
                self.handle_pointer_release(&e)
            }
            WidgetEvent::FocusIn(e) => {
                let e = *e;
                self.handle_focus_in(&e)
            }
            WidgetEvent::FocusOut(e) => {
                let e = *e;
                self.handle_focus_out(&e)
            }
        };
        if handled {
            event.accept();
        }
        handled
    }
}

impl std::fmt::Debug for Combobox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combobox")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("query", &self.query)
            .field("state", &self.state)
            .field("filtered_len", &self.filtered.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn fruits() -> Combobox {
        Combobox::new("fruit", "Fruit").with_options(
            ["Apple", "Banana", "Cherry", "Date"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    fn committed(combo: &Combobox) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        combo.changed.connect(move |value: &String| {
            log_clone.lock().push(value.clone());
        });
        log
    }

    fn key(combo: &mut Combobox, k: Key) -> bool {
        let mut event = WidgetEvent::KeyPress(KeyPressEvent::plain(k));
        combo.event(&mut event);
        event.is_accepted()
    }

    fn type_text(combo: &mut Combobox, text: &str) {
        for ch in text.chars() {
            let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(
                Key::Unknown(0),
                crate::events::KeyboardModifiers::NONE,
                ch.to_string(),
                false,
            ));
            combo.event(&mut event);
        }
    }

    fn blur(combo: &mut Combobox) {
        let mut event = WidgetEvent::FocusOut(FocusOutEvent::new(
            crate::events::FocusReason::Other,
        ));
        combo.event(&mut event);
    }

    #[test]
    fn test_creation_defaults() {
        let combo = fruits();
        assert!(!combo.is_open());
        assert_eq!(combo.value(), "");
        assert_eq!(combo.query(), "");
        assert_eq!(combo.active_index(), None);
        assert_eq!(combo.option_count(), 4);
    }

    #[test]
    fn test_open_activates_first_option() {
        let mut combo = fruits();
        combo.open_list();
        assert_eq!(combo.active_index(), Some(0));
        assert_eq!(combo.active_text(), Some("Apple".to_string()));
    }

    #[test]
    fn test_arrow_down_opens_when_closed() {
        let mut combo = fruits();
        assert!(key(&mut combo, Key::ArrowDown));
        assert!(combo.is_open());
        // First option active immediately, not after an extra key press
        assert_eq!(combo.active_index(), Some(0));
    }

    #[test]
    fn test_navigation_clamps_no_wraparound() {
        let mut combo = fruits();
        combo.open_list();
        for _ in 0..10 {
            key(&mut combo, Key::ArrowDown);
        }
        assert_eq!(combo.active_index(), Some(3));
        for _ in 0..10 {
            key(&mut combo, Key::ArrowUp);
        }
        assert_eq!(combo.active_index(), Some(0));
    }

    #[test]
    fn test_home_end_when_open() {
        let mut combo = fruits();
        combo.open_list();
        key(&mut combo, Key::End);
        assert_eq!(combo.active_index(), Some(3));
        key(&mut combo, Key::Home);
        assert_eq!(combo.active_index(), Some(0));
    }

    #[test]
    fn test_enter_commits_first_option_without_navigation() {
        let mut combo = fruits();
        let log = committed(&combo);
        combo.open_list();
        key(&mut combo, Key::Enter);
        assert_eq!(*log.lock(), vec!["Apple".to_string()]);
        assert!(!combo.is_open());
    }

    #[test]
    fn test_enter_commits_after_arrow_down() {
        let mut combo = fruits();
        let log = committed(&combo);
        combo.open_list();
        key(&mut combo, Key::ArrowDown);
        key(&mut combo, Key::Enter);
        assert_eq!(*log.lock(), vec!["Banana".to_string()]);
    }

    #[test]
    fn test_escape_never_commits() {
        let mut combo = fruits().with_value("Cherry");
        let log = committed(&combo);
        combo.open_list();
        key(&mut combo, Key::ArrowDown);
        key(&mut combo, Key::ArrowDown);
        key(&mut combo, Key::Escape);
        assert!(log.lock().is_empty());
        assert!(!combo.is_open());
        assert_eq!(combo.display_text(), "Cherry");
    }

    #[test]
    fn test_escape_requests_input_focus() {
        let mut combo = fruits();
        let requested = Arc::new(Mutex::new(0));
        let requested_clone = requested.clone();
        combo.focus_requested.connect(move |_: &()| {
            *requested_clone.lock() += 1;
        });
        combo.open_list();
        key(&mut combo, Key::Escape);
        assert_eq!(*requested.lock(), 1);
    }

    #[test]
    fn test_typing_filters_and_opens() {
        let mut combo = fruits();
        type_text(&mut combo, "an");
        assert!(combo.is_open());
        // Substring match: Banana only
        assert_eq!(combo.filtered_texts(), vec!["Banana".to_string()]);
        assert_eq!(combo.active_index(), Some(0));
    }

    #[test]
    fn test_typing_no_match_keeps_open_with_no_active() {
        let mut combo = fruits();
        type_text(&mut combo, "Custom");
        assert!(combo.is_open());
        assert!(combo.filtered_indices().is_empty());
        assert_eq!(combo.active_index(), None);
    }

    #[test]
    fn test_free_text_commit_on_blur() {
        let mut combo = fruits();
        let log = committed(&combo);
        type_text(&mut combo, "Custom");
        blur(&mut combo);
        assert_eq!(*log.lock(), vec!["Custom".to_string()]);
        assert_eq!(combo.query(), "");
        assert!(!combo.is_open());
    }

    #[test]
    fn test_blur_without_query_commits_nothing() {
        let mut combo = fruits().with_value("Apple");
        let log = committed(&combo);
        combo.open_list();
        blur(&mut combo);
        assert!(log.lock().is_empty());
        assert!(!combo.is_open());
    }

    #[test]
    fn test_blur_with_unchanged_query_commits_nothing() {
        let mut combo = fruits().with_value("Apple");
        let log = committed(&combo);
        // Editing starts from the displayed text; deleting and retyping the
        // same character leaves the query equal to the committed value.
        key(&mut combo, Key::Backspace);
        type_text(&mut combo, "e");
        assert_eq!(combo.query(), "Apple");
        blur(&mut combo);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_enter_with_no_match_commits_free_text_immediately() {
        let mut combo = fruits();
        let log = committed(&combo);
        type_text(&mut combo, "Quince");
        key(&mut combo, Key::Enter);
        assert_eq!(*log.lock(), vec!["Quince".to_string()]);
        assert!(!combo.is_open());
    }

    #[test]
    fn test_tab_closes_without_accepting() {
        let mut combo = fruits();
        combo.open_list();
        let accepted = key(&mut combo, Key::Tab);
        assert!(!accepted); // propagates to the host focus manager
        assert!(!combo.is_open());
    }

    #[test]
    fn test_tab_then_blur_commits_query() {
        let mut combo = fruits();
        let log = committed(&combo);
        type_text(&mut combo, "Kumquat");
        key(&mut combo, Key::Tab);
        blur(&mut combo);
        assert_eq!(*log.lock(), vec!["Kumquat".to_string()]);
    }

    #[test]
    fn test_option_click_commits_exact_string() {
        let mut combo = fruits();
        let log = committed(&combo);
        combo.open_list();
        let rect = combo.option_rect(2).unwrap();
        let mut event = WidgetEvent::PointerPress(PointerPressEvent::primary(Point::new(
            rect.origin.x + 5.0,
            rect.origin.y + 5.0,
        )));
        combo.event(&mut event);
        assert_eq!(*log.lock(), vec!["Cherry".to_string()]);
        assert_eq!(combo.query(), "");
        assert!(!combo.is_open());
    }

    #[test]
    fn test_toggle_click_does_not_double_commit() {
        let mut combo = fruits();
        let log = committed(&combo);
        type_text(&mut combo, "Custom");

        // The toggle press raises the guard before the input's blur lands.
        let toggle_pos = Point::new(combo.toggle_rect().origin.x + 5.0, 5.0);
        let mut press = WidgetEvent::PointerPress(PointerPressEvent::primary(toggle_pos));
        combo.event(&mut press);
        blur(&mut combo); // blur caused by the toggle press itself
        let mut release = WidgetEvent::PointerRelease(PointerReleaseEvent::primary(toggle_pos));
        combo.event(&mut release);

        // No commit happened; the query is still live.
        assert!(log.lock().is_empty());
        assert_eq!(combo.query(), "Custom");

        // A genuine blur afterwards commits exactly once.
        blur(&mut combo);
        assert_eq!(*log.lock(), vec!["Custom".to_string()]);
    }

    #[test]
    fn test_outside_click_routes_through_commit_boundary() {
        let mut combo = fruits();
        let log = committed(&combo);
        type_text(&mut combo, "Medlar");
        let below_popup = Point::new(10.0, combo.popup_rect().bottom() + 50.0);
        let mut event = WidgetEvent::PointerPress(PointerPressEvent::primary(below_popup));
        combo.event(&mut event);
        assert_eq!(*log.lock(), vec!["Medlar".to_string()]);
        assert!(!combo.is_open());
    }

    #[test]
    fn test_set_options_while_open_reclamps() {
        let mut combo = fruits();
        combo.open_list();
        key(&mut combo, Key::End);
        assert_eq!(combo.active_index(), Some(3));

        combo.set_options(vec!["Apple".to_string()]);
        assert!(combo.is_open());
        assert_eq!(combo.active_index(), Some(0));

        combo.set_options(Vec::new());
        assert!(combo.is_open());
        assert_eq!(combo.active_index(), None);
    }

    #[test]
    fn test_set_options_preserves_live_query() {
        let mut combo = fruits();
        type_text(&mut combo, "err");
        assert_eq!(combo.filtered_texts(), vec!["Cherry".to_string()]);

        combo.set_options(vec!["Serrano".to_string(), "Bell".to_string()]);
        assert_eq!(combo.query(), "err");
        assert_eq!(combo.filtered_texts(), vec!["Serrano".to_string()]);
        assert_eq!(combo.active_index(), Some(0));
    }

    #[test]
    fn test_set_value_does_not_clobber_query() {
        let mut combo = fruits();
        type_text(&mut combo, "Ban");
        combo.set_value("Date");
        assert_eq!(combo.query(), "Ban");
        assert_eq!(combo.display_text(), "Ban");
    }

    #[test]
    fn test_display_text_follows_value_when_not_editing() {
        let mut combo = fruits();
        assert_eq!(combo.display_text(), "");
        combo.set_value("Banana");
        assert_eq!(combo.display_text(), "Banana");
    }

    #[test]
    fn test_backspace_is_grapheme_aware() {
        let mut combo = Combobox::new("g", "G").with_value("Rosé");
        key(&mut combo, Key::Backspace);
        assert_eq!(combo.query(), "Ros");
    }

    #[test]
    fn test_changed_emitted_once_per_commit_not_per_keystroke() {
        let mut combo = fruits();
        let log = committed(&combo);
        let keystrokes = Arc::new(Mutex::new(0));
        let keystrokes_clone = keystrokes.clone();
        combo.query_changed.connect(move |_| {
            *keystrokes_clone.lock() += 1;
        });

        type_text(&mut combo, "Custom");
        assert_eq!(*keystrokes.lock(), 6);
        assert!(log.lock().is_empty());

        blur(&mut combo);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_metrics_clamp_to_min_hit_target() {
        let combo = fruits().with_metrics(ComboMetrics {
            width: 200.0,
            input_height: 20.0,
            toggle_width: 10.0,
            item_height: 12.0,
        });
        let m = combo.metrics();
        assert_eq!(m.input_height, MIN_HIT_TARGET);
        assert_eq!(m.toggle_width, MIN_HIT_TARGET);
        assert_eq!(m.item_height, MIN_HIT_TARGET);
    }

    #[test]
    fn test_hit_test_parts() {
        let mut combo = fruits();
        assert_eq!(combo.hit_test(Point::new(5.0, 5.0)), ComboPart::Input);
        let toggle_x = combo.toggle_rect().origin.x + 1.0;
        assert_eq!(combo.hit_test(Point::new(toggle_x, 5.0)), ComboPart::Toggle);
        // Popup area is Outside while closed
        assert_eq!(combo.hit_test(Point::new(5.0, 60.0)), ComboPart::Outside);

        combo.open_list();
        assert_eq!(combo.hit_test(Point::new(5.0, 50.0)), ComboPart::Option(0));
    }

    #[test]
    fn test_hit_test_notice_row_when_no_match() {
        let mut combo = fruits();
        type_text(&mut combo, "zzz");
        assert!(combo.is_open());
        assert_eq!(combo.hit_test(Point::new(5.0, 50.0)), ComboPart::Notice);

        // Clicking the notice row neither commits nor closes
        let log = committed(&combo);
        let mut event =
            WidgetEvent::PointerPress(PointerPressEvent::primary(Point::new(5.0, 50.0)));
        combo.event(&mut event);
        assert!(event.is_accepted());
        assert!(log.lock().is_empty());
        assert!(combo.is_open());
    }

    #[test]
    fn test_scroll_follows_active() {
        let mut combo = Combobox::new("n", "Numbers")
            .with_options((0..20).map(|i| format!("item {i}")).collect())
            .with_max_visible_items(5);
        combo.open_list();
        for _ in 0..7 {
            key(&mut combo, Key::ArrowDown);
        }
        assert_eq!(combo.active_index(), Some(7));
        assert_eq!(combo.visible_range(), 3..8);

        key(&mut combo, Key::Home);
        assert_eq!(combo.visible_range(), 0..5);
    }
}
