//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireReviewer`] -- requires `admin` or `agent`.
//! - [`rbac::RequireCreator`] -- requires `creator` or `admin`.

pub mod auth;
pub mod rbac;
