//! Core types for the Jogo do Bicho panel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod animal;
pub mod id;
pub mod money;
pub mod role;

pub use animal::Animal;
pub use id::*;
pub use money::Money;
pub use role::{Role, RoleError};
