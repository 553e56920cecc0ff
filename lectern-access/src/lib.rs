//! Client-side permission checks for admin menus and actions.
//!
//! - [`PermissionSet`] answers whether the granted codes allow an action
//!   code, by segment-aligned prefix or `*` wildcard.
//! - [`visible_menus`] prunes a [`lectern_tree::Forest`] of menu rows down to
//!   the ones the grants allow.

mod error;
mod menu;
mod permission;

pub use error::{AccessError, Result};
pub use menu::{PERMS_FIELD, menu_perms, visible_menus};
pub use permission::{
    ALL_PERMISSIONS, PermissionSet, SEGMENT_SEPARATOR, WILDCARD,
};
