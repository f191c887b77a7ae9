//! JSON-RPC wallet agent: the production [`Wallet`] implementation.
//!
//! Speaks JSON-RPC 2.0 over HTTP to a wallet-enabled node: the node holds the
//! keys, prompts its user where applicable, signs and broadcasts. This crate
//! only shuttles requests and responses.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ethers::types::Address;
use serde_json::{json, Value};

use crate::error::{ClientError, Result};
use crate::wallet::{Receipt, TxRequest, Wallet};

/// EIP-1193 error code for "the user rejected the request".
const CODE_USER_REJECTED: i64 = 4001;

pub struct RpcWallet {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

/// Reject non-HTTPS endpoints unless loopback or `allow_insecure` is set.
fn validate_node_url(url: &str, allow_insecure: bool) -> Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        if allow_insecure || is_loopback_url(url) {
            return Ok(());
        }
        return Err(ClientError::InvalidState(format!(
            "Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections."
        )));
    }
    Err(ClientError::InvalidState(format!(
        "Invalid node URL scheme: {url}\nExpected an https:// URL."
    )))
}

fn is_loopback_url(url: &str) -> bool {
    let authority = url
        .trim_start_matches("http://")
        .split(['/', '?'])
        .next()
        .unwrap_or("");
    let host = match authority.rsplit_once(':') {
        Some((h, port)) if port.chars().all(|c| c.is_ascii_digit()) => h,
        _ => authority,
    };
    host == "localhost" || host == "[::1]" || host.starts_with("127.")
}

/// Map a JSON-RPC error object to the typed domain error.
fn map_rpc_error(code: i64, message: &str) -> ClientError {
    if code == CODE_USER_REJECTED {
        ClientError::Declined(message.to_string())
    } else {
        ClientError::Ledger(format!("Node error {code}: {message}"))
    }
}

/// Shape a [`TxRequest`] as the JSON-RPC transaction parameter object.
/// Addresses and quantities are hex strings per the wire convention.
fn tx_params(tx: &TxRequest) -> Value {
    let mut obj = json!({
        "from": format!("{:#x}", tx.from),
        "to": format!("{:#x}", tx.to),
    });
    if let Some(gas) = tx.gas {
        obj["gas"] = json!(format!("{gas:#x}"));
    }
    if let Some(value) = tx.value {
        obj["value"] = json!(format!("{value:#x}"));
    }
    if let Some(data) = &tx.data {
        obj["data"] = json!(format!("0x{}", hex::encode(data)));
    }
    obj
}

fn decode_hex_payload(s: &str) -> Result<Vec<u8>> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped)
        .map_err(|e| ClientError::Ledger(format!("Malformed hex payload from node: {e}")))
}

impl RpcWallet {
    pub fn new(url: &str, allow_insecure: bool) -> Result<Self> {
        validate_node_url(url, allow_insecure)?;
        Ok(Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue a single JSON-RPC call and unwrap the `result` field.
    async fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{method} request failed: {e}")))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("{method} returned malformed JSON: {e}")))?;

        if let Some(err) = envelope.get("error") {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(map_rpc_error(code, message));
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| ClientError::Ledger(format!("{method} response carried no result")))
    }

    fn account_list(result: Value) -> Result<Vec<String>> {
        let accounts = result
            .as_array()
            .ok_or_else(|| ClientError::Ledger("Account query returned a non-array".into()))?
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect();
        Ok(accounts)
    }
}

#[async_trait]
impl Wallet for RpcWallet {
    async fn accounts(&self) -> Result<Vec<String>> {
        let result = self.rpc("eth_accounts", json!([])).await?;
        Self::account_list(result)
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        let result = self.rpc("eth_requestAccounts", json!([])).await?;
        Self::account_list(result)
    }

    async fn send_transaction(&self, tx: &TxRequest) -> Result<String> {
        let result = self
            .rpc("eth_sendTransaction", json!([tx_params(tx)]))
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::Ledger("Transaction submission returned no hash".into()))
    }

    async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([
            {
                "to": format!("{to:#x}"),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest",
        ]);
        let result = self.rpc("eth_call", params).await?;
        let payload = result
            .as_str()
            .ok_or_else(|| ClientError::Ledger("Read call returned a non-string payload".into()))?;
        decode_hex_payload(payload)
    }

    async fn transaction_receipt(&self, hash: &str) -> Result<Option<Receipt>> {
        let result = self
            .rpc("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let status = result
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("0x0");
        Ok(Some(Receipt {
            succeeded: status == "0x1",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U256;

    #[test]
    fn rejects_http_url_without_insecure() {
        let err = RpcWallet::new("http://node.example.com:8545", false)
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("--insecure"));
    }

    #[test]
    fn accepts_loopback_http() {
        assert!(RpcWallet::new("http://127.0.0.1:8545", false).is_ok());
        assert!(RpcWallet::new("http://localhost:8545", false).is_ok());
        assert!(RpcWallet::new("http://[::1]:8545", false).is_ok());
    }

    #[test]
    fn accepts_http_with_insecure() {
        assert!(RpcWallet::new("http://node.example.com:8545", true).is_ok());
    }

    #[test]
    fn accepts_https() {
        assert!(RpcWallet::new("https://node.example.com", false).is_ok());
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = RpcWallet::new("ftp://example.com", false)
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("Invalid node URL scheme"));
    }

    #[test]
    fn user_rejection_maps_to_declined() {
        let err = map_rpc_error(4001, "User rejected the request.");
        assert!(matches!(err, ClientError::Declined(_)));
    }

    #[test]
    fn other_codes_map_to_ledger() {
        let err = map_rpc_error(-32000, "insufficient funds");
        assert!(matches!(err, ClientError::Ledger(_)));
        assert!(err.to_string().contains("-32000"));
    }

    #[test]
    fn tx_params_hex_encodes_quantities() {
        let from: Address = "0x1111111111111111111111111111111111111111"
            .parse()
            .unwrap();
        let to: Address = "0x2222222222222222222222222222222222222222"
            .parse()
            .unwrap();
        let tx = TxRequest::value_transfer(from, to, U256::exp10(18));
        let params = tx_params(&tx);

        assert_eq!(
            params["from"],
            "0x1111111111111111111111111111111111111111"
        );
        assert_eq!(params["gas"], "0x5208");
        assert_eq!(params["value"], "0xde0b6b3a7640000");
        assert!(params.get("data").is_none());
    }

    #[test]
    fn tx_params_carries_call_data() {
        let addr = Address::zero();
        let tx = TxRequest::contract_call(addr, addr, vec![0xde, 0xad]);
        let params = tx_params(&tx);
        assert_eq!(params["data"], "0xdead");
        assert!(params.get("gas").is_none());
        assert!(params.get("value").is_none());
    }

    #[test]
    fn hex_payload_round_trip() {
        assert_eq!(decode_hex_payload("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode_hex_payload("").unwrap(), Vec::<u8>::new());
        assert!(decode_hex_payload("0xzz").is_err());
    }
}
