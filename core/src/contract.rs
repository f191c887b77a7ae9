//! Handle for the deployed transfer-log contract.
//!
//! All reads go through the wallet's read-call surface; the one state-changing
//! operation is submitted through the wallet for signing and broadcast, then
//! confirmed by polling receipts.

use std::sync::Arc;
use std::time::Duration;

use ethers::types::{Address, U256};

use crate::abi::{
    decode_transfer_count, decode_transfers, encode_get_all_transfers, encode_get_transfer_count,
    encode_record_transfer, RawTransfer,
};
use crate::error::{ClientError, Result};
use crate::wallet::{TxRequest, Wallet};

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A contract client bound to the fixed deployed address and whatever signer
/// the wallet currently exposes. Cheap to construct; built fresh per use.
pub struct TransferLog {
    wallet: Arc<dyn Wallet>,
    contract: Address,
}

impl TransferLog {
    pub(crate) fn bind(wallet: Arc<dyn Wallet>, contract: Address) -> Self {
        Self { wallet, contract }
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Fetch the full remote record set. No pagination; the contract returns
    /// everything it holds.
    pub async fn all_records(&self) -> Result<Vec<RawTransfer>> {
        let data = self
            .wallet
            .call(&self.contract, &encode_get_all_transfers())
            .await?;
        decode_transfers(&data)
    }

    /// Number of records appended so far.
    pub async fn record_count(&self) -> Result<u64> {
        let data = self
            .wallet
            .call(&self.contract, &encode_get_transfer_count())
            .await?;
        let count = decode_transfer_count(&data)?;
        if count > U256::from(u64::MAX) {
            return Err(ClientError::Ledger(format!(
                "Transfer count out of range: {count}"
            )));
        }
        Ok(count.as_u64())
    }

    /// Submit a record append through the wallet, signed by its current
    /// signer. Returns a pending handle; the record is not yet confirmed.
    pub async fn append_record(
        &self,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<PendingRecord> {
        let signer = self.current_signer().await?;
        let data = encode_record_transfer(receiver, amount, message, keyword);
        let tx = TxRequest::contract_call(signer, self.contract, data);
        let hash = self.wallet.send_transaction(&tx).await?;
        Ok(PendingRecord {
            wallet: self.wallet.clone(),
            hash,
        })
    }

    /// The wallet's current signer: first authorized account, resolved at
    /// call time rather than cached at bind time.
    async fn current_signer(&self) -> Result<Address> {
        let accounts = self.wallet.accounts().await?;
        let first = accounts.first().ok_or_else(|| {
            ClientError::InvalidState("The wallet exposes no authorized account.".into())
        })?;
        first.parse().map_err(|e| {
            ClientError::Ledger(format!("Wallet returned a malformed account '{first}': {e}"))
        })
    }
}

/// A broadcast but unconfirmed record append.
pub struct PendingRecord {
    wallet: Arc<dyn Wallet>,
    hash: String,
}

impl PendingRecord {
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Block until the ledger confirms the record. Polls at a fixed interval
    /// with no timeout; a hung node blocks indefinitely.
    pub async fn wait(&self) -> Result<()> {
        loop {
            if let Some(receipt) = self.wallet.transaction_receipt(&self.hash).await? {
                if receipt.succeeded {
                    return Ok(());
                }
                return Err(ClientError::Ledger(format!(
                    "Transaction failed on chain: {}",
                    self.hash
                )));
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
