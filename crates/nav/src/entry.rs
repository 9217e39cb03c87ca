use serde::{Deserialize, Serialize};

use washdesk_auth::Requirement;

/// A single entry in the navigation tree.
///
/// Exactly one of `path` or `sub_items` is meaningful at render time: a leaf
/// links somewhere, a container expands into its sub-items. An entry with
/// neither is inert. Sub-item order is significant and preserved by
/// filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Requirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<NavEntry>,
}

impl NavEntry {
    /// Top-level link with an icon.
    pub fn leaf(name: impl Into<String>, icon: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: Some(icon.into()),
            path: Some(path.into()),
            permission: None,
            sub_items: Vec::new(),
        }
    }

    /// Container entry that expands into `sub_items`.
    pub fn group(
        name: impl Into<String>,
        icon: impl Into<String>,
        sub_items: Vec<NavEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: Some(icon.into()),
            path: None,
            permission: None,
            sub_items,
        }
    }

    /// Sub-item: a plain link without an icon.
    pub fn item(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            path: Some(path.into()),
            permission: None,
            sub_items: Vec::new(),
        }
    }

    /// Attach a visibility requirement.
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.permission = Some(requirement);
        self
    }

    pub fn has_sub_items(&self) -> bool {
        !self.sub_items.is_empty()
    }
}

/// A titled group of entries, rendered with a section header.
///
/// Sections may carry their own requirement: when the user holds none of the
/// listed permissions the whole titled group (header included) is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Requirement>,
    pub entries: Vec<NavEntry>,
}

impl MenuSection {
    pub fn new(title: impl Into<String>, entries: Vec<NavEntry>) -> Self {
        Self {
            title: title.into(),
            permission: None,
            entries,
        }
    }

    pub fn require(mut self, requirement: Requirement) -> Self {
        self.permission = Some(requirement);
        self
    }
}
