//! # Domain Layer
//!
//! Node response types and the error taxonomy of the node boundary.

pub mod errors;
pub mod rpc_error;
pub mod types;

pub use errors::*;
pub use rpc_error::*;
pub use types::*;
