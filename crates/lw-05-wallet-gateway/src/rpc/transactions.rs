//! Transaction methods: `GetTransaction`, `SendTransaction`,
//! `GetAddressTxids`, `GetUtxos`.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use lw_02_node_rpc::AddressTxidsRequest;
use shared_types::{hash_from_hex, hash_to_hex};
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

use super::{stop_after_error, to_json, ResponseStream, WalletRpc};
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::types::{
    RawTransaction, SendResponse, TransparentAddress, TransparentAddressBlockFilter, TxFilter,
    Utxo,
};

/// `t` followed by 34 base58 characters.
pub fn validate_taddr(address: &str) -> ApiResult<()> {
    let valid = address.len() == 35
        && address.starts_with('t')
        && address.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(ApiError::invalid_params(format!(
            "invalid transparent address: {}",
            address
        )))
    }
}

impl WalletRpc {
    /// GetTransaction - raw transaction by txid
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, filter: TxFilter) -> ApiResult<RawTransaction> {
        let hash = filter
            .hash
            .ok_or_else(|| ApiError::invalid_params("transaction id required"))?;
        let txid = hash_from_hex(&hash)?;
        match self.node.get_raw_transaction(&txid).await? {
            Some(tx) => Ok(tx.into()),
            None => Err(ApiError::resource_not_found(format!("transaction {}", hash))),
        }
    }

    /// SendTransaction - relay a raw transaction to the node
    ///
    /// Node rejections are results, not errors.
    #[instrument(skip(self, tx), fields(size = tx.data.len() / 2))]
    pub async fn send_transaction(&self, tx: RawTransaction) -> ApiResult<SendResponse> {
        let raw = hex::decode(&tx.data)?;
        if raw.is_empty() {
            return Err(ApiError::invalid_params("empty transaction"));
        }
        let outcome = self.node.send_raw_transaction(&raw).await?;
        if outcome.is_accepted() {
            info!(txid = %outcome.message, "Transaction relayed");
            lw_telemetry::TRANSACTIONS_SENT
                .with_label_values(&["accepted"])
                .inc();
        } else {
            warn!(code = outcome.code, reason = %outcome.message, "Transaction rejected");
            lw_telemetry::TRANSACTIONS_SENT
                .with_label_values(&["rejected"])
                .inc();
        }
        Ok(outcome.into())
    }

    /// GetAddressTxids - transactions touching a t-address within a range
    #[instrument(skip(self))]
    pub async fn get_address_txids(
        &self,
        filter: TransparentAddressBlockFilter,
    ) -> ApiResult<ResponseStream> {
        validate_taddr(&filter.address)?;
        let deadline = Instant::now() + self.stream_timeout;
        let request = AddressTxidsRequest {
            addresses: vec![filter.address],
            start: filter.range.start.height,
            end: filter.range.end.height,
        };
        let txids = timeout_at(deadline, self.node.get_address_txids(&request))
            .await
            .map_err(|_| ApiError::timeout("GetAddressTxids"))??;
        debug!(count = txids.len(), "address txids found");

        let node = Arc::clone(&self.node);
        let transactions = stream::iter(txids).then(move |txid| {
            let node = Arc::clone(&node);
            async move {
                let lookup = timeout_at(deadline, node.get_raw_transaction(&txid))
                    .await
                    .map_err(|_| ApiError::timeout("GetAddressTxids"))??;
                match lookup {
                    Some(tx) => to_json(&RawTransaction::from(tx)),
                    None => Err(ApiError::resource_not_found(format!(
                        "transaction {}",
                        hash_to_hex(&txid)
                    ))),
                }
            }
        });
        Ok(stop_after_error(transactions))
    }

    /// GetUtxos - unspent outputs of a t-address
    #[instrument(skip(self))]
    pub async fn get_utxos(&self, address: TransparentAddress) -> ApiResult<ResponseStream> {
        validate_taddr(&address.address)?;
        let utxos = timeout(self.stream_timeout, self.node.get_address_utxos(&address.address))
            .await
            .map_err(|_| ApiError::timeout("GetUtxos"))??;
        let items = stream::iter(utxos).map(|utxo| to_json(&Utxo::from(utxo)));
        Ok(stop_after_error(items))
    }
}
