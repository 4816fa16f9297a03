//! Jogo do Bicho Core - Shared types library.
//!
//! This crate provides the pieces of the back-office panel that do not touch
//! the network:
//! - [`types`] - Newtype IDs, administrator roles, animals and money
//! - [`search`] - In-memory search filtering over fetched lists
//! - [`permissions`] - Role-gated navigation and actions
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The `admin` crate owns everything that talks to the backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod permissions;
pub mod search;
pub mod types;

pub use permissions::{Action, NavEntry};
pub use search::{Haystack, SearchState, normalize};
pub use types::*;
