//! Permission-gated filtering of the navigation tree.

use washdesk_auth::PermissionSet;

use crate::entry::{MenuSection, NavEntry};

/// Produce the subset of `entries` visible to a user holding `granted`.
///
/// An entry with no declared requirement is always kept; one with a
/// requirement is kept iff at least one of its alternatives is held. Kept
/// entries have their sub-items filtered by the same rule, recursively. A
/// kept container whose sub-items all filter away is still returned rather
/// than collapsed. Input order is preserved at every level.
pub fn visible_menu(entries: &[NavEntry], granted: &PermissionSet) -> Vec<NavEntry> {
    entries
        .iter()
        .filter(|entry| is_visible(entry, granted))
        .map(|entry| {
            let mut kept = entry.clone();
            if kept.has_sub_items() {
                kept.sub_items = visible_menu(&entry.sub_items, granted);
            }
            kept
        })
        .collect()
}

/// Filter whole sections: the section requirement gates the titled group,
/// then each surviving section's entries are filtered with [`visible_menu`].
pub fn visible_sections(sections: &[MenuSection], granted: &PermissionSet) -> Vec<MenuSection> {
    sections
        .iter()
        .filter(|section| {
            section
                .permission
                .as_ref()
                .is_none_or(|req| req.satisfied_by(granted))
        })
        .map(|section| {
            let mut kept = section.clone();
            kept.entries = visible_menu(&section.entries, granted);
            kept
        })
        .collect()
}

fn is_visible(entry: &NavEntry, granted: &PermissionSet) -> bool {
    entry
        .permission
        .as_ref()
        .is_none_or(|req| req.satisfied_by(granted))
}
