//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CREATOR: &str = "creator";
/// Automated reviewer accounts allowed to take admin certification decisions.
pub const ROLE_AGENT: &str = "agent";

/// Whether `role` is one of the platform's roles.
pub fn is_known_role(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_CREATOR | ROLE_AGENT)
}

/// Whether the role may approve, reject or grade certifications.
pub fn can_review(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_AGENT
}
