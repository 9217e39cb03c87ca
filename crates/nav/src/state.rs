//! Submenu expand/collapse state.

use crate::entry::MenuSection;

/// Position of a collapsible entry: section index, entry index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmenuKey {
    pub section: usize,
    pub entry: usize,
}

impl SubmenuKey {
    pub fn new(section: usize, entry: usize) -> Self {
        Self { section, entry }
    }
}

/// Tracks which submenu is currently expanded.
///
/// At most one submenu is open at a time: opening an entry closes whichever
/// entry was open before it, and toggling the open entry collapses it. The
/// invariant is structural — there is a single `Option<SubmenuKey>`, not a
/// flag per entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmenuState {
    open: Option<SubmenuKey>,
}

impl SubmenuState {
    /// Everything collapsed.
    pub fn collapsed() -> Self {
        Self::default()
    }

    /// Initial state for a route: the first entry with a sub-item whose path
    /// equals `path` starts expanded; with no match everything is collapsed.
    pub fn for_route(sections: &[MenuSection], path: &str) -> Self {
        for (section_idx, section) in sections.iter().enumerate() {
            for (entry_idx, entry) in section.entries.iter().enumerate() {
                let matched = entry
                    .sub_items
                    .iter()
                    .any(|sub| sub.path.as_deref() == Some(path));
                if matched {
                    return Self {
                        open: Some(SubmenuKey::new(section_idx, entry_idx)),
                    };
                }
            }
        }
        Self::collapsed()
    }

    /// Collapse `key` if it is the open entry, otherwise open it (implicitly
    /// closing the previously open entry).
    pub fn toggle(&mut self, key: SubmenuKey) {
        self.open = if self.open == Some(key) { None } else { Some(key) };
    }

    pub fn is_open(&self, key: SubmenuKey) -> bool {
        self.open == Some(key)
    }

    pub fn open_entry(&self) -> Option<SubmenuKey> {
        self.open
    }
}
