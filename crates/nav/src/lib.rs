//! `washdesk-nav` — declarative navigation for the dashboard.
//!
//! The sidebar is static configuration: an ordered list of titled sections,
//! each holding an ordered tree of entries, annotated with the permission
//! requirements that gate their visibility. This crate owns that
//! configuration, the permission filter that derives the visible subset for
//! the current user, and the submenu expand/collapse state machine.
//!
//! Rendering (markup, icons, styling) is a consumer concern; entries carry
//! only names, icon slugs, and route paths.

pub mod entry;
pub mod filter;
pub mod menu;
pub mod state;

pub use entry::{MenuSection, NavEntry};
pub use filter::{visible_menu, visible_sections};
pub use state::{SubmenuKey, SubmenuState};
