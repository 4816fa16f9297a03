//! Request guards for admin.
//!
//! Authentication is an extractor rather than a layer: each protected handler
//! takes [`RequireAdminAuth`], which restores the session from the cookie.
//! Role checks happen inside handlers through [`require`] because several
//! pages need the profile before they can decide.

pub mod auth;

pub use auth::{AdminAuthRejection, CurrentAdmin, OptionalAdminAuth, RequireAdminAuth, require};
