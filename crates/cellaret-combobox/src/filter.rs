//! Option filtering for the combobox.
//!
//! The filter is a pure function over the option list and the current query:
//! it returns the ordered subsequence of options containing the query as a
//! case-insensitive substring. An empty query is the identity filter, which
//! is what makes "show all options on open" independent of whether the user
//! has typed anything. An empty result with a non-empty query is a valid,
//! expected state, not an error.

/// Trait for providing options to a combobox.
///
/// Implement this trait to provide custom data sources. The option list is
/// a set of suggestions, not an enumeration constraint: the combobox also
/// accepts free text that matches nothing here.
pub trait OptionsModel: Send + Sync {
    /// Get the number of options in the model.
    fn row_count(&self) -> usize;

    /// Get the text at the given index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn text(&self, index: usize) -> Option<String>;

    /// Find the index of an option by exact text.
    ///
    /// Returns the first matching index, or `None` if not found.
    fn find_text(&self, text: &str) -> Option<usize> {
        (0..self.row_count()).find(|&i| self.text(i).is_some_and(|t| t == text))
    }

    /// Get the indices of options containing `query` as a case-insensitive
    /// substring, preserving original relative order.
    ///
    /// An empty query matches every option.
    fn filter(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return (0..self.row_count()).collect();
        }

        let needle = query.to_lowercase();
        (0..self.row_count())
            .filter(|&i| {
                self.text(i)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// A simple options model backed by a list of strings.
///
/// This is the common case: the caller resolves its suggestion list up
/// front (possibly refetching between renders) and hands it over as plain
/// strings. No identity is assumed across [`set_items`](Self::set_items)
/// calls.
#[derive(Debug, Clone, Default)]
pub struct StringListModel {
    items: Vec<String>,
}

impl StringListModel {
    /// Create a new model with the given items.
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    /// Create an empty model.
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Get a reference to the items.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Set the items.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
    }

    /// Add an item.
    pub fn add_item(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    /// Remove an item by index.
    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Clear all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl OptionsModel for StringListModel {
    fn row_count(&self) -> usize {
        self.items.len()
    }

    fn text(&self, index: usize) -> Option<String> {
        self.items.get(index).cloned()
    }
}

impl From<Vec<String>> for StringListModel {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl From<Vec<&str>> for StringListModel {
    fn from(items: Vec<&str>) -> Self {
        Self::new(items.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StringListModel {
    fn from(items: [&str; N]) -> Self {
        Self::new(items.into_iter().map(String::from).collect())
    }
}
