//! Cross-subsystem scenarios.

pub mod fake_node;

#[cfg(test)]
mod end_to_end;
#[cfg(test)]
mod ingest_retrieve;
