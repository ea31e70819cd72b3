//! Series selection with a capacity cap, catalog search and the
//! keyboard-navigable candidate list.

use crate::dataset::SeriesCatalog;

/// Result of trying to add a series to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The series was appended.
    Added,
    /// The series was already selected; nothing changed.
    AlreadySelected,
    /// The selection is full; nothing changed.
    AtCapacity,
}

impl SelectOutcome {
    /// Whether the selection changed (and a refresh is due).
    pub fn changed(&self) -> bool {
        matches!(self, SelectOutcome::Added)
    }
}

/// Insertion-ordered set of selected series names, capped at `max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    names: Vec<String>,
    max: usize,
}

impl Selection {
    /// Create an empty selection holding at most `max` series.
    pub fn new(max: usize) -> Self {
        Self {
            names: Vec::new(),
            max,
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.names.len() >= self.max
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Add `name` unless it is already present or the selection is full.
    pub fn select(&mut self, name: &str) -> SelectOutcome {
        if self.contains(name) {
            SelectOutcome::AlreadySelected
        } else if self.is_full() {
            SelectOutcome::AtCapacity
        } else {
            self.names.push(name.to_string());
            SelectOutcome::Added
        }
    }

    /// Remove `name`. Returns whether it was selected.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    /// Catalog entries not yet selected whose name contains `term`,
    /// case-insensitively, in catalog order.
    pub fn search<'a>(&self, catalog: &'a SeriesCatalog, term: &str) -> Vec<&'a str> {
        let term = term.to_lowercase();
        catalog
            .names()
            .iter()
            .filter(|name| !self.contains(name))
            .filter(|name| name.to_lowercase().contains(&term))
            .map(String::as_str)
            .collect()
    }

    /// Inline validation text, if any.
    pub fn validation_message(&self) -> Option<String> {
        if self.is_full() {
            Some(format!("Maximum of {} cities allowed.", self.max))
        } else if self.is_empty() {
            Some("Select at least one city.".to_string())
        } else {
            None
        }
    }
}

/// Keys handled by the candidate dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// The filtered candidate dropdown under the search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    items: Vec<String>,
    highlighted: Option<usize>,
    visible: bool,
}

impl CandidateList {
    /// Rebuild from the current search term. Resets the highlight.
    pub fn refresh(&mut self, selection: &Selection, catalog: &SeriesCatalog, term: &str) {
        self.items = selection
            .search(catalog, term)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.highlighted = None;
        self.visible = !term.is_empty() && !self.items.is_empty();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Clear items and hide.
    pub fn reset(&mut self) {
        self.items.clear();
        self.highlighted = None;
        self.visible = false;
    }

    /// Apply a navigation key. Returns the name to select on Enter.
    pub fn navigate(&mut self, key: NavKey) -> Option<String> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }

        match key {
            NavKey::Down => {
                self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1) % len));
                None
            }
            NavKey::Up => {
                self.highlighted = Some(self.highlighted.map_or(len - 1, |i| (i + len - 1) % len));
                None
            }
            NavKey::Enter => self.highlighted.and_then(|i| self.items.get(i).cloned()),
            NavKey::Escape => {
                self.hide();
                None
            }
        }
    }
}
