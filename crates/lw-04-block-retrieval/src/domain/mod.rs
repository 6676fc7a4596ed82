//! # Domain Layer

pub mod errors;
pub mod stream;

pub use errors::RetrievalError;
pub use stream::{BlockRangeStream, RangeItem};

use std::time::Duration;

/// Range stream deadline when the caller supplies none.
pub const DEFAULT_RANGE_DEADLINE: Duration = Duration::from_secs(30);
