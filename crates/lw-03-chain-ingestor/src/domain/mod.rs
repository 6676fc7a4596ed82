//! # Domain Layer

pub mod errors;
pub mod state;

pub use errors::IngestorError;
pub use state::{
    invariant_reorg_bounded, IngestorState, RoundOutcome, DEFAULT_MAX_FAILURES,
    DEFAULT_MAX_REORG_ROUNDS, DEFAULT_POLL_INTERVAL, DEFAULT_REWIND_STEP,
};
