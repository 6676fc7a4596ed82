//! `GetLightdInfo`.

use tracing::instrument;

use super::WalletRpc;
use crate::domain::error::ApiResult;
use crate::domain::types::LightdInfo;

/// Version string reported to wallets.
pub const SERVER_VERSION: &str = concat!("lwd-", env!("CARGO_PKG_VERSION"));

impl WalletRpc {
    /// GetLightdInfo - server identity and the node's chain facts
    #[instrument(skip(self))]
    pub async fn get_lightd_info(&self) -> ApiResult<LightdInfo> {
        let chain = self.node.get_chain_info().await?;
        Ok(LightdInfo::new(SERVER_VERSION, &self.vendor, chain))
    }
}
