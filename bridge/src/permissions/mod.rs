//! Permission system types and utilities.
//!
//! Tri-state model per (guild, action): a caller may do nothing, everything,
//! or only a named subset of role grants.

pub mod models;
pub mod resolver;

pub use models::*;
pub use resolver::{resolve, PermissionDecision, PermissionError};
