//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Administrator session: sign-in, restore, sign-out

pub mod auth;

pub use auth::{AuthContext, AuthError, CookieTokenStore, MemoryTokenStore, Navigation, TokenStore};
