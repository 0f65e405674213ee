//! Well-known role name constants.
//!
//! These must match the role names issued by the identity service inside the
//! JWT `roles` claim.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ORGANIZER: &str = "organizer";
