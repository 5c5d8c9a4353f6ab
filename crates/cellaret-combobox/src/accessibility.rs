//! Accessibility support for the combobox.
//!
//! Integration with platform accessibility APIs through
//! [AccessKit](https://accesskit.dev/): Windows (UI Automation), macOS
//! (NSAccessibility), and Linux (AT-SPI).
//!
//! The combobox exposes a composite subtree rather than a single node:
//!
//! - the text input (`ComboBox` role) with the expanded state, the current
//!   value, and the active option as its active descendant
//! - the toggle button
//! - the option list (`List` role) with a `ListItem` per filtered option
//! - a static notice row when the filter matches nothing
//! - the error message node, linked through `described_by`, when the host
//!   has set a validation message
//!
//! Keyboard focus stays on the input node throughout; navigating the list
//! only moves `active_descendant`.

use accesskit::{Action, Invalid, Node, NodeId, Role};

use crate::combobox::{ComboPart, Combobox};
use crate::geometry::Rect;

/// Accessibility roles for widgets.
///
/// These map to AccessKit roles, which in turn map to platform
/// accessibility roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessibleRole {
    /// Unknown or generic widget.
    #[default]
    Unknown,
    /// A combobox (text input with an attached option list).
    ComboBox,
    /// A plain text input.
    TextInput,
    /// A push button.
    Button,
    /// A list container.
    List,
    /// An item within a list.
    ListItem,
    /// A static text label.
    Label,
}

impl AccessibleRole {
    /// Convert to the corresponding AccessKit role.
    pub fn to_accesskit_role(self) -> Role {
        match self {
            AccessibleRole::Unknown => Role::Unknown,
            AccessibleRole::ComboBox => Role::ComboBox,
            AccessibleRole::TextInput => Role::TextInput,
            AccessibleRole::Button => Role::Button,
            AccessibleRole::List => Role::List,
            AccessibleRole::ListItem => Role::ListItem,
            AccessibleRole::Label => Role::Label,
        }
    }
}

/// Trait for widgets that provide accessibility information.
///
/// Widgets override the queries relevant to their functionality; the
/// defaults describe an inert generic widget. [`build_accessible_node`]
/// assembles an AccessKit [`Node`] from the queries and rarely needs
/// overriding.
///
/// [`build_accessible_node`]: Accessible::build_accessible_node
pub trait Accessible {
    /// Get the accessibility role of this widget.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Unknown
    }

    /// Get the accessible name. This is the primary label screen readers
    /// announce; for inputs it is the associated label text.
    fn accessible_name(&self) -> Option<String> {
        None
    }

    /// Get the accessible description, providing context beyond the name.
    fn accessible_description(&self) -> Option<String> {
        None
    }

    /// Get the current value as a string, for inputs.
    fn accessible_value(&self) -> Option<String> {
        None
    }

    /// Get the expanded state for expandable widgets.
    fn is_accessible_expanded(&self) -> Option<bool> {
        None
    }

    /// Get the selected state for selectable widgets.
    fn is_accessible_selected(&self) -> Option<bool> {
        None
    }

    /// Get the placeholder text for input widgets.
    fn accessible_placeholder(&self) -> Option<String> {
        None
    }

    /// Check if the widget is required (for form inputs).
    fn is_accessible_required(&self) -> bool {
        false
    }

    /// Check if the widget is in an error state.
    fn is_accessible_invalid(&self) -> bool {
        false
    }

    /// Get the actions supported by this widget.
    fn accessible_actions(&self) -> Vec<Action> {
        Vec::new()
    }

    /// Get IDs of nodes that describe this widget (error messages, hints).
    fn accessible_described_by(&self) -> Vec<NodeId> {
        Vec::new()
    }

    /// Get the active descendant for composite widgets.
    ///
    /// For the combobox this is the highlighted option while the list is
    /// open; keyboard focus itself never leaves the input.
    fn accessible_active_descendant(&self) -> Option<NodeId> {
        None
    }

    /// Get the position in set (1-indexed) for list items.
    fn accessible_position_in_set(&self) -> Option<usize> {
        None
    }

    /// Get the set size for list items.
    fn accessible_set_size(&self) -> Option<usize> {
        None
    }

    /// Build an AccessKit node from this widget's accessibility queries.
    fn build_accessible_node(&self, bounds: Rect) -> Node {
        let mut node = Node::new(self.accessible_role().to_accesskit_role());

        node.set_bounds(accesskit::Rect {
            x0: bounds.origin.x as f64,
            y0: bounds.origin.y as f64,
            x1: bounds.right() as f64,
            y1: bounds.bottom() as f64,
        });

        if let Some(name) = self.accessible_name() {
            node.set_label(name);
        }
        if let Some(desc) = self.accessible_description() {
            node.set_description(desc);
        }
        if let Some(value) = self.accessible_value() {
            node.set_value(value);
        }
        if let Some(expanded) = self.is_accessible_expanded() {
            node.set_expanded(expanded);
        }
        if let Some(selected) = self.is_accessible_selected() {
            node.set_selected(selected);
        }
        if let Some(placeholder) = self.accessible_placeholder() {
            node.set_placeholder(placeholder);
        }
        if self.is_accessible_required() {
            node.set_required();
        }
        if self.is_accessible_invalid() {
            node.set_invalid(Invalid::True);
        }
        for action in self.accessible_actions() {
            node.add_action(action);
        }
        let described_by = self.accessible_described_by();
        if !described_by.is_empty() {
            node.set_described_by(described_by);
        }
        if let Some(active) = self.accessible_active_descendant() {
            node.set_active_descendant(active);
        }
        if let Some(pos) = self.accessible_position_in_set() {
            node.set_position_in_set(pos);
        }
        if let Some(size) = self.accessible_set_size() {
            node.set_size_of_set(size);
        }

        node
    }
}

/// Node ID offsets within a combobox instance.
///
/// Each combobox reserves a 16-bit ID block derived from its instance
/// counter; option rows start at [`OPTION_BASE`] and there is room for
/// every realistic option list.
const INPUT_OFFSET: u64 = 0;
const TOGGLE_OFFSET: u64 = 1;
const LIST_OFFSET: u64 = 2;
const NOTICE_OFFSET: u64 = 3;
const ERROR_OFFSET: u64 = 4;
const OPTION_BASE: u64 = 16;

fn part_node_id(instance: u64, offset: u64) -> NodeId {
    NodeId((instance << 16) | offset)
}

impl Combobox {
    /// AccessKit node ID for a part of this combobox.
    ///
    /// Returns `None` for [`ComboPart::Outside`].
    pub fn accessible_node_id(&self, part: ComboPart) -> Option<NodeId> {
        let offset = match part {
            ComboPart::Input => INPUT_OFFSET,
            ComboPart::Toggle => TOGGLE_OFFSET,
            ComboPart::Option(index) => OPTION_BASE + index as u64,
            ComboPart::Notice => NOTICE_OFFSET,
            ComboPart::Outside => return None,
        };
        Some(part_node_id(self.instance(), offset))
    }

    /// Build the accessibility subtree for this combobox.
    ///
    /// Returns the nodes in parent-first order; the first entry is the
    /// input node that hosts keyboard focus. The host merges these into its
    /// per-window `TreeUpdate`.
    pub fn accessibility_tree(&self) -> Vec<(NodeId, Node)> {
        let instance = self.instance();
        let mut nodes = Vec::new();

        let mut input = self.build_accessible_node(self.input_rect());
        let mut input_children = Vec::new();

        let mut toggle = Node::new(Role::Button);
        let toggle_rect = self.toggle_rect();
        toggle.set_bounds(accesskit::Rect {
            x0: toggle_rect.origin.x as f64,
            y0: toggle_rect.origin.y as f64,
            x1: toggle_rect.right() as f64,
            y1: toggle_rect.bottom() as f64,
        });
        toggle.set_label("Toggle options");
        toggle.add_action(Action::Click);
        if self.is_open() {
            toggle.add_action(Action::Collapse);
        } else {
            toggle.add_action(Action::Expand);
        }
        input_children.push(part_node_id(instance, TOGGLE_OFFSET));

        let mut list_nodes = Vec::new();
        if self.is_open() {
            let mut list = Node::new(Role::List);
            let popup = self.popup_rect();
            list.set_bounds(accesskit::Rect {
                x0: popup.origin.x as f64,
                y0: popup.origin.y as f64,
                x1: popup.right() as f64,
                y1: popup.bottom() as f64,
            });
            list.set_label(self.label());

            if self.filtered_len() == 0 {
                // Announced instead of an empty, silent list.
                let mut notice = Node::new(Role::Label);
                notice.set_label("No matching options");
                list.set_children(vec![part_node_id(instance, NOTICE_OFFSET)]);
                list_nodes.push((part_node_id(instance, NOTICE_OFFSET), notice));
            } else {
                let total = self.filtered_len();
                let mut children = Vec::with_capacity(total);
                for index in 0..total {
                    let id = part_node_id(instance, OPTION_BASE + index as u64);
                    children.push(id);

                    let mut item = Node::new(Role::ListItem);
                    if let Some(text) = self.filtered_text(index) {
                        item.set_label(text);
                    }
                    // Rows scrolled out of view keep their logical place in
                    // the set but carry no bounds.
                    if let Some(rect) = self.option_rect(index) {
                        item.set_bounds(accesskit::Rect {
                            x0: rect.origin.x as f64,
                            y0: rect.origin.y as f64,
                            x1: rect.right() as f64,
                            y1: rect.bottom() as f64,
                        });
                    }
                    item.set_selected(self.active_index() == Some(index));
                    item.set_position_in_set(index + 1);
                    item.set_size_of_set(total);
                    item.add_action(Action::Click);
                    list_nodes.push((id, item));
                }
                list.set_children(children);
            }

            input_children.push(part_node_id(instance, LIST_OFFSET));
            list_nodes.insert(0, (part_node_id(instance, LIST_OFFSET), list));
        }

        if let Some(message) = self.error() {
            let mut error = Node::new(Role::Label);
            error.set_label(message);
            input_children.push(part_node_id(instance, ERROR_OFFSET));
            nodes.push((part_node_id(instance, ERROR_OFFSET), error));
        }

        input.set_children(input_children);
        nodes.insert(0, (part_node_id(instance, INPUT_OFFSET), input));
        nodes.insert(1, (part_node_id(instance, TOGGLE_OFFSET), toggle));
        nodes.extend(list_nodes);
        nodes
    }
}

impl Accessible for Combobox {
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ComboBox
    }

    fn accessible_name(&self) -> Option<String> {
        Some(self.label().to_string())
    }

    fn accessible_value(&self) -> Option<String> {
        Some(self.display_text().to_string())
    }

    fn is_accessible_expanded(&self) -> Option<bool> {
        Some(self.is_open())
    }

    fn accessible_placeholder(&self) -> Option<String> {
        if self.placeholder().is_empty() {
            None
        } else {
            Some(self.placeholder().to_string())
        }
    }

    fn is_accessible_required(&self) -> bool {
        self.is_required()
    }

    fn is_accessible_invalid(&self) -> bool {
        self.error().is_some()
    }

    fn accessible_actions(&self) -> Vec<Action> {
        vec![Action::Focus, Action::Expand, Action::Collapse]
    }

    fn accessible_described_by(&self) -> Vec<NodeId> {
        if self.error().is_some() {
            vec![part_node_id(self.instance(), ERROR_OFFSET)]
        } else {
            Vec::new()
        }
    }

    fn accessible_active_descendant(&self) -> Option<NodeId> {
        let index = self.active_index()?;
        Some(part_node_id(self.instance(), OPTION_BASE + index as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Key, KeyPressEvent, WidgetEvent};

    fn combo() -> Combobox {
        Combobox::new("grape", "Grape variety").with_options(
            ["Riesling", "Pinot Noir", "Nebbiolo"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    fn node_for(tree: &[(NodeId, Node)], id: NodeId) -> &Node {
        &tree.iter().find(|(nid, _)| *nid == id).unwrap().1
    }

    #[test]
    fn test_input_node_role_and_label() {
        let combo = combo();
        let node = combo.build_accessible_node(combo.input_rect());
        assert_eq!(node.role(), Role::ComboBox);
        assert_eq!(node.label(), Some("Grape variety"));
        assert_eq!(node.is_expanded(), Some(false));
    }

    #[test]
    fn test_closed_tree_has_no_list() {
        let combo = combo();
        let tree = combo.accessibility_tree();
        // Input + toggle only
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].1.role(), Role::Button);
    }

    #[test]
    fn test_open_tree_lists_filtered_options() {
        let mut combo = combo();
        combo.open_list();
        let tree = combo.accessibility_tree();
        let items: Vec<_> = tree
            .iter()
            .filter(|(_, n)| n.role() == Role::ListItem)
            .collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].1.label(), Some("Riesling"));
        assert_eq!(items[0].1.position_in_set(), Some(1));
        assert_eq!(items[0].1.size_of_set(), Some(3));
        // Open activates the first option
        assert_eq!(items[0].1.is_selected(), Some(true));
        assert_eq!(items[1].1.is_selected(), Some(false));
    }

    #[test]
    fn test_active_descendant_follows_navigation() {
        let mut combo = combo();
        combo.open_list();
        let first = combo.accessible_active_descendant();
        assert!(first.is_some());

        let mut event = WidgetEvent::KeyPress(KeyPressEvent::plain(Key::ArrowDown));
        combo.event(&mut event);
        let second = combo.accessible_active_descendant();
        assert_ne!(first, second);

        let id = combo.accessible_node_id(ComboPart::Option(1));
        assert_eq!(second, id);
    }

    #[test]
    fn test_no_match_notice_node() {
        let mut combo = combo();
        for ch in "zzz".chars() {
            let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(
                Key::Unknown(0),
                crate::events::KeyboardModifiers::NONE,
                ch.to_string(),
                false,
            ));
            combo.event(&mut event);
        }
        let tree = combo.accessibility_tree();
        let notice_id = combo.accessible_node_id(ComboPart::Notice).unwrap();
        let notice = node_for(&tree, notice_id);
        assert_eq!(notice.label(), Some("No matching options"));
        assert!(combo.accessible_active_descendant().is_none());
    }

    #[test]
    fn test_error_message_described_by() {
        let combo = combo().with_error("Unknown grape variety");
        let tree = combo.accessibility_tree();
        let input = node_for(&tree, combo.accessible_node_id(ComboPart::Input).unwrap());
        assert!(!input.described_by().is_empty());

        let node = combo.build_accessible_node(combo.input_rect());
        assert_eq!(node.invalid(), Some(Invalid::True));
    }

    #[test]
    fn test_option_bounds_meet_min_hit_target() {
        let mut combo = combo();
        combo.open_list();
        let tree = combo.accessibility_tree();
        let id = combo.accessible_node_id(ComboPart::Option(0)).unwrap();
        let bounds = node_for(&tree, id).bounds().unwrap();
        assert!(bounds.y1 - bounds.y0 >= crate::combobox::MIN_HIT_TARGET as f64);
    }

    #[test]
    fn test_node_ids_distinct_across_instances() {
        let a = combo();
        let b = combo();
        assert_ne!(
            a.accessible_node_id(ComboPart::Input),
            b.accessible_node_id(ComboPart::Input)
        );
    }
}
