//! Where ingestion begins.

use shared_types::BlockHeight;
use tracing::info;

/// `max(resume, sapling_activation)`. Compact blocks carry only Sapling
/// data, so nothing below activation is worth caching.
pub fn resolve_start_height(
    resume: Option<BlockHeight>,
    sapling_activation: Option<BlockHeight>,
) -> BlockHeight {
    let resume = resume.unwrap_or(0);
    let activation = sapling_activation.unwrap_or(0);
    if resume < activation {
        info!(resume, activation, "Raising start height to Sapling activation");
    }
    resume.max(activation)
}
