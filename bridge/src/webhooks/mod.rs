//! Role-grant webhooks
//!
//! Per-role configuration and HMAC signing for the POST that grants a
//! server role. Delivery lives in [`crate::configurator::session`].

pub mod signing;
pub mod types;

pub use types::{HashAlgorithm, RoleGrantRequest, WebhookRoleConfig};
