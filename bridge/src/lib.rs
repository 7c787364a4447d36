//! Squad Admin Configurator Bridge
//!
//! Resolves what a chat caller may do from their roles, talks to the
//! configurator privileges API on their behalf and renders the result.

pub mod cli;
pub mod config;
pub mod configurator;
pub mod permissions;
pub mod privileges;
pub mod render;
pub mod webhooks;
