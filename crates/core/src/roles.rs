//! Well-known role name constants.
//!
//! These must match the role strings the user directory hands out.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
