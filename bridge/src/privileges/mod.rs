//! Privileges commands: look up a privileged user, grant a server role.

pub mod error;
pub mod outcome;
pub mod service;

pub use error::PrivilegesError;
pub use outcome::Outcome;
pub use service::{Caller, GrantCommand, PrivilegesService};
