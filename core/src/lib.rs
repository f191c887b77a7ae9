use std::path::PathBuf;

use anyhow::Context;

pub mod abi;
pub mod commands;
pub mod contract;
pub mod controller;
pub mod display;
pub mod error;
pub mod gateway;
pub mod rpc;
pub mod store;
pub mod wallet;

pub use commands::Command;
pub use contract::{PendingRecord, TransferLog};
pub use controller::{
    FormData, FormField, Snapshot, SubmitReceipt, TransferController, TransferRecord,
};
pub use error::{ClientError, Result};
pub use gateway::{Gateway, DEFAULT_CONTRACT};
pub use rpc::RpcWallet;
pub use store::CountStore;
pub use wallet::{Receipt, TxRequest, Wallet, TRANSFER_GAS_LIMIT};

pub use ethers::types::{Address, U256};

/// XDG-compliant data directory for the count cache.
/// Linux: `~/.local/share/sendlog/`, macOS: `~/Library/Application Support/sendlog/`
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Cannot determine data directory")?
        .join("sendlog");
    Ok(dir)
}
