//! # Domain Layer
//!
//! Window bookkeeping and cache entries. No locking, no I/O.

pub mod entities;
pub mod errors;
pub mod invariants;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
