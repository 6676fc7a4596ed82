//! Domain layer: wallet API types, errors, configuration and the method table.

pub mod config;
pub mod error;
pub mod methods;
pub mod types;

pub use config::*;
pub use error::*;
pub use methods::*;
pub use types::*;
