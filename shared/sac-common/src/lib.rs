//! Squad Admin Configurator Common Library
//!
//! Record types returned by the configurator API, shared by the bridge and
//! its tests.

pub mod types;

pub use types::*;
