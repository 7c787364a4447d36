//! Configurator API client
//!
//! Scoped HTTP sessions against the upstream privileges service, response
//! validation and the shared error taxonomy.

pub mod error;
pub mod session;
pub mod validate;

pub use error::ApiError;
pub use session::{ConfiguratorSession, QueryParams};
