//! Transaction state controller.
//!
//! Orchestrates wallet connection, transfer submission and transfer listing,
//! and owns every piece of state the presentation layer observes. All remote
//! work goes through a fresh gateway handle per operation; all failures are
//! logged and surfaced as typed [`ClientError`] values, uniformly, wallet absence
//! included.

use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use ethers::types::Address;
use serde::Serialize;

use crate::abi::RawTransfer;
use crate::display;
use crate::error::{ClientError, Result};
use crate::gateway::Gateway;
use crate::store::CountStore;
use crate::wallet::{TxRequest, Wallet};

/// A form field, addressed by name. The typed stand-in for the stringly
/// field-name merge a dynamic UI layer would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "to" | "address_to" | "destination" => Ok(Self::AddressTo),
            "amount" => Ok(Self::Amount),
            "keyword" => Ok(Self::Keyword),
            "message" => Ok(Self::Message),
            other => Err(format!(
                "Unknown form field: '{other}'. Use 'to', 'amount', 'keyword', or 'message'."
            )),
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddressTo => write!(f, "to"),
            Self::Amount => write!(f, "amount"),
            Self::Keyword => write!(f, "keyword"),
            Self::Message => write!(f, "message"),
        }
    }
}

/// User-entered transfer form. Mutated field-by-field, never validated here,
/// and deliberately not reset after submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormData {
    pub address_to: String,
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

/// Display projection of one on-chain record. Rebuilt wholesale on every
/// refresh; carries no identity key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRecord {
    pub address_from: String,
    pub address_to: String,
    /// Localized date string derived from the ledger's seconds timestamp.
    pub timestamp: String,
    /// Decimal display amount: base units / 10^18.
    pub amount: f64,
    pub keyword: String,
    pub message: String,
}

impl TransferRecord {
    fn from_raw(raw: RawTransfer) -> Self {
        Self {
            address_from: format!("{:#x}", raw.sender),
            address_to: format!("{:#x}", raw.receiver),
            timestamp: display::format_timestamp(raw.timestamp.low_u64()),
            amount: display::wei_to_display(raw.amount),
            keyword: raw.keyword,
            message: raw.message,
        }
    }
}

/// The full state bundle exposed to presentation code, one typed struct.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub account: Option<String>,
    pub form: FormData,
    pub transfers: Vec<TransferRecord>,
    pub transfer_count: u64,
    pub is_submitting: bool,
}

/// Hashes of the two on-chain actions a submission performs.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub transfer_hash: String,
    pub record_hash: String,
}

struct State {
    account: Option<String>,
    form: FormData,
    transfers: Vec<TransferRecord>,
    transfer_count: u64,
    is_submitting: bool,
}

pub struct TransferController {
    gateway: Gateway,
    store: CountStore,
    state: Mutex<State>,
}

/// Log-and-return failure policy: every operation records its cause before
/// handing the typed error to the caller. No retry, no recovery.
async fn logged<T, F>(op: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match fut.await {
        Ok(v) => Ok(v),
        Err(e) => {
            log::error!("{op} failed: {e}");
            Err(e)
        }
    }
}

impl TransferController {
    /// Build a controller over an injected wallet (or its absence) and the
    /// fixed contract address. The cached count seeds the display value until
    /// a remote count is known.
    pub fn new(wallet: Option<Arc<dyn Wallet>>, contract: Address, store: CountStore) -> Self {
        let cached_count = store.get().unwrap_or(0);
        Self {
            gateway: Gateway::new(wallet, contract),
            store,
            state: Mutex::new(State {
                account: None,
                form: FormData::default(),
                transfers: Vec::new(),
                transfer_count: cached_count,
                is_submitting: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clone-out of the observable state.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state();
        Snapshot {
            account: state.account.clone(),
            form: state.form.clone(),
            transfers: state.transfers.clone(),
            transfer_count: state.transfer_count,
            is_submitting: state.is_submitting,
        }
    }

    pub fn contract_address(&self) -> Address {
        self.gateway.contract_address()
    }

    /// Pure merge into form state. No validation, no side effects.
    pub fn handle_change(&self, field: FormField, value: &str) {
        let mut state = self.state();
        match field {
            FormField::AddressTo => state.form.address_to = value.to_string(),
            FormField::Amount => state.form.amount = value.to_string(),
            FormField::Keyword => state.form.keyword = value.to_string(),
            FormField::Message => state.form.message = value.to_string(),
        }
    }

    /// Request authorization from the wallet; adopt the first account it
    /// returns. Prompts the wallet's user; idempotent once authorized.
    pub async fn connect(&self) -> Result<String> {
        logged("connect", self.connect_inner()).await
    }

    /// Startup check: silently adopt an already-authorized account and, if
    /// one exists, refresh the transfer list exactly once. Never prompts.
    pub async fn check_existing_connection(&self) -> Result<Option<String>> {
        logged("connection check", self.check_existing_connection_inner()).await
    }

    /// Startup count cache: write the remote count to persistent storage for
    /// the next cold start. Does not touch authoritative state.
    pub async fn refresh_cached_count(&self) -> Result<u64> {
        logged("count refresh", self.refresh_cached_count_inner()).await
    }

    /// Replace the transfer list with the full remote set.
    pub async fn refresh_transfers(&self) -> Result<()> {
        logged("transfer refresh", self.refresh_transfers_inner()).await
    }

    /// Submit the current form: a value transfer to the destination, then the
    /// contract's record append, awaited to confirmation. Two independent
    /// on-chain actions with no atomicity between them.
    pub async fn submit(&self) -> Result<SubmitReceipt> {
        logged("submit", self.submit_inner()).await
    }

    async fn connect_inner(&self) -> Result<String> {
        let wallet = self.gateway.wallet()?;
        let accounts = wallet.request_accounts().await?;
        let first = accounts.first().ok_or_else(|| {
            ClientError::Declined("The wallet returned no authorized account.".into())
        })?;
        self.state().account = Some(first.clone());
        log::debug!("connected account {first}");
        Ok(first.clone())
    }

    async fn check_existing_connection_inner(&self) -> Result<Option<String>> {
        let wallet = self.gateway.wallet()?;
        let accounts = wallet.accounts().await?;
        let first = match accounts.first() {
            Some(first) => first.clone(),
            None => {
                log::debug!("no authorized account found");
                return Ok(None);
            }
        };
        self.state().account = Some(first.clone());
        self.refresh_transfers_inner().await?;
        Ok(Some(first))
    }

    async fn refresh_cached_count_inner(&self) -> Result<u64> {
        let handle = self.gateway.handle()?;
        let count = handle.record_count().await?;
        self.store.set(count)?;
        log::debug!("cached transfer count {count}");
        Ok(count)
    }

    async fn refresh_transfers_inner(&self) -> Result<()> {
        let handle = self.gateway.handle()?;
        let records = handle.all_records().await?;
        let transfers: Vec<TransferRecord> =
            records.into_iter().map(TransferRecord::from_raw).collect();
        log::debug!("fetched {} transfers", transfers.len());
        self.state().transfers = transfers;
        Ok(())
    }

    async fn submit_inner(&self) -> Result<SubmitReceipt> {
        let (form, account) = {
            let state = self.state();
            (state.form.clone(), state.account.clone())
        };
        let wallet = self.gateway.wallet()?.clone();

        let account = account.ok_or_else(|| {
            ClientError::InvalidState("No connected account. Run 'connect' first.".into())
        })?;
        let from: Address = account.parse().map_err(|e| {
            ClientError::InvalidState(format!("Connected account '{account}' is not usable: {e}"))
        })?;
        let to: Address = form.address_to.trim().parse().map_err(|e| {
            ClientError::InvalidState(format!(
                "Destination '{}' is not an address: {e}",
                form.address_to
            ))
        })?;
        let amount = display::parse_amount(&form.amount).map_err(ClientError::InvalidAmount)?;

        // Phase 1: move the funds. The wallet signs and broadcasts.
        let transfer = TxRequest::value_transfer(from, to, amount);
        let transfer_hash = wallet.send_transaction(&transfer).await?;
        log::debug!("value transfer submitted: {transfer_hash}");

        // Phase 2: append the log entry. Independent of phase 1: if it fails
        // here, the funds moved without a record.
        let pending = match self
            .gateway
            .handle()?
            .append_record(to, amount, &form.message, &form.keyword)
            .await
        {
            Ok(pending) => pending,
            Err(e) => {
                log::warn!(
                    "value transfer {transfer_hash} is on chain but the record append was not \
                     accepted; the log entry is missing"
                );
                return Err(e);
            }
        };

        self.state().is_submitting = true;
        log::debug!("awaiting confirmation of record {}", pending.hash());
        let confirmation = pending.wait().await;
        self.state().is_submitting = false;
        confirmation?;
        log::debug!("record {} confirmed", pending.hash());

        let count = self.gateway.handle()?.record_count().await?;
        self.state().transfer_count = count;
        self.refresh_transfers_inner().await?;

        Ok(SubmitReceipt {
            transfer_hash,
            record_hash: pending.hash().to_string(),
        })
    }
}
