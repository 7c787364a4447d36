//! Configurator Types

mod grant;
mod steam;
mod user;

pub use grant::ServerRoleGrant;
pub use steam::{InvalidSteamId, SteamId};
pub use user::{PrivilegedUser, RecordId};
