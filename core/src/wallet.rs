//! Wallet abstraction: the externally supplied signing and broadcast agent.
//!
//! The client never constructs or signs transactions itself. Everything that
//! touches key material goes through a [`Wallet`]: account queries,
//! authorization prompts, transaction submission, read-only calls and receipt
//! lookups. The production implementation is [`crate::rpc::RpcWallet`]; tests
//! substitute a scripted fake.

use async_trait::async_trait;
use ethers::types::{Address, U256};

use crate::error::Result;

/// Fixed gas limit for a plain value transfer (no contract code executed).
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// A transaction handed to the wallet for signing and broadcast.
///
/// Value transfers set `value` and leave `data` empty; contract calls set
/// `data` and usually no `value`. Gas is only pinned for plain transfers;
/// contract submissions let the agent estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    pub gas: Option<U256>,
    pub value: Option<U256>,
    pub data: Option<Vec<u8>>,
}

impl TxRequest {
    /// A plain value transfer with the fixed transfer gas limit.
    pub fn value_transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to,
            gas: Some(U256::from(TRANSFER_GAS_LIMIT)),
            value: Some(value),
            data: None,
        }
    }

    /// A contract invocation carrying ABI call data.
    pub fn contract_call(from: Address, to: Address, data: Vec<u8>) -> Self {
        Self {
            from,
            to,
            gas: None,
            value: None,
            data: Some(data),
        }
    }
}

/// Receipt of a mined transaction, reduced to what confirmation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Receipt {
    /// True if the transaction executed successfully.
    pub succeeded: bool,
}

/// The injected wallet agent.
///
/// Implementations own the connection to whatever holds the keys (a node's
/// account manager, a browser extension bridge, a fake in tests) and are
/// shared behind `Arc<dyn Wallet>`.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Accounts already authorized for this client. Never prompts.
    async fn accounts(&self) -> Result<Vec<String>>;

    /// Request authorization; may prompt the wallet's user. Returns the
    /// authorized accounts, first one being the active signer.
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Sign and broadcast a transaction. Returns the transaction hash.
    async fn send_transaction(&self, tx: &TxRequest) -> Result<String>;

    /// Execute a read-only contract call and return the raw return data.
    async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>>;

    /// Look up the receipt for a broadcast transaction. `None` until mined.
    async fn transaction_receipt(&self, hash: &str) -> Result<Option<Receipt>>;
}
