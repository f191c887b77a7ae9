//! Wallet/ledger gateway.
//!
//! Owns the injected wallet (or its absence) and the fixed contract address,
//! and produces contract handles on demand. Handles are never cached: a fresh
//! one per call guarantees the wallet's current signer is used, at the cost
//! of re-resolving the signer on every operation.

use std::sync::Arc;

use ethers::types::Address;

use crate::contract::TransferLog;
use crate::error::{ClientError, Result};
use crate::wallet::Wallet;

/// Deployed transfer-log contract address used when none is configured.
pub const DEFAULT_CONTRACT: &str = "0x26ce7c1976c5eec83ea6ac22d87bf4673d75e37c";

pub struct Gateway {
    wallet: Option<Arc<dyn Wallet>>,
    contract: Address,
}

impl Gateway {
    pub fn new(wallet: Option<Arc<dyn Wallet>>, contract: Address) -> Self {
        Self { wallet, contract }
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// The injected wallet, or `WalletAbsent`: the single uniform signal for
    /// a missing signing agent across every operation.
    pub fn wallet(&self) -> Result<&Arc<dyn Wallet>> {
        self.wallet.as_ref().ok_or(ClientError::WalletAbsent)
    }

    /// A fresh contract handle over the wallet's current signer.
    pub fn handle(&self) -> Result<TransferLog> {
        Ok(TransferLog::bind(self.wallet()?.clone(), self.contract))
    }
}
