//! # Lightwalletd Test Suite
//!
//! Scenarios that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── fake_node.rs        # axum stand-in for zcashd
//! │   ├── ingest_retrieve.rs  # ingestor → cache → retrieval
//! │   └── end_to_end.rs       # lightwalletd runtime over HTTP
//! └── benches/
//!     └── cache_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lw-tests
//! cargo bench -p lw-tests
//! ```

pub mod integration;
