//! Request middleware.

pub mod auth;

pub use auth::{AuthUser, OrgCookie, auth_middleware};
