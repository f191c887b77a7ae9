//! ABI codec for the transfer-log contract.
//!
//! Manual encoding for the three contract operations, no abigen. The deployed
//! interface is fixed:
//!
//! - `recordTransfer(address receiver, uint256 amount, string message, string keyword)`
//! - `getAllTransfers() -> (address,address,uint256,string,uint256,string)[]`
//! - `getTransferCount() -> uint256`

use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, U256};
use ethers::utils::keccak256;

use crate::error::{ClientError, Result};

const RECORD_TRANSFER_SIG: &str = "recordTransfer(address,uint256,string,string)";
const GET_ALL_TRANSFERS_SIG: &str = "getAllTransfers()";
const GET_TRANSFER_COUNT_SIG: &str = "getTransferCount()";

/// One log entry as stored on chain, before display mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransfer {
    pub sender: Address,
    pub receiver: Address,
    pub amount: U256,
    pub message: String,
    /// Seconds since the epoch, as the contract records it.
    pub timestamp: U256,
    pub keyword: String,
}

/// Tuple layout of a log entry in `getAllTransfers()` return data.
fn transfer_tuple() -> Vec<ParamType> {
    vec![
        ParamType::Address,
        ParamType::Address,
        ParamType::Uint(256),
        ParamType::String,
        ParamType::Uint(256),
        ParamType::String,
    ]
}

/// First 4 bytes of the keccak256 hash of the canonical signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&hash[..4]);
    sel
}

pub fn encode_get_all_transfers() -> Vec<u8> {
    selector(GET_ALL_TRANSFERS_SIG).to_vec()
}

pub fn encode_get_transfer_count() -> Vec<u8> {
    selector(GET_TRANSFER_COUNT_SIG).to_vec()
}

pub fn encode_record_transfer(
    receiver: Address,
    amount: U256,
    message: &str,
    keyword: &str,
) -> Vec<u8> {
    let mut data = selector(RECORD_TRANSFER_SIG).to_vec();
    data.extend(abi::encode(&[
        Token::Address(receiver),
        Token::Uint(amount),
        Token::String(message.to_string()),
        Token::String(keyword.to_string()),
    ]));
    data
}

/// Decode a `getTransferCount()` response.
pub fn decode_transfer_count(data: &[u8]) -> Result<U256> {
    if data.len() < 32 {
        return Err(ClientError::Ledger(format!(
            "Count response too short: {} bytes",
            data.len()
        )));
    }
    let tokens = abi::decode(&[ParamType::Uint(256)], data)
        .map_err(|e| ClientError::Ledger(format!("Failed to decode transfer count: {e}")))?;
    match tokens.into_iter().next() {
        Some(Token::Uint(count)) => Ok(count),
        _ => Err(ClientError::Ledger(
            "Transfer count response was not a uint256".into(),
        )),
    }
}

/// Decode a `getAllTransfers()` response into raw log entries.
pub fn decode_transfers(data: &[u8]) -> Result<Vec<RawTransfer>> {
    let array = ParamType::Array(Box::new(ParamType::Tuple(transfer_tuple())));
    let tokens = abi::decode(&[array], data)
        .map_err(|e| ClientError::Ledger(format!("Failed to decode transfer list: {e}")))?;

    let items = match tokens.into_iter().next() {
        Some(Token::Array(items)) => items,
        _ => {
            return Err(ClientError::Ledger(
                "Transfer list response was not an array".into(),
            ))
        }
    };

    items.into_iter().map(decode_transfer_entry).collect()
}

fn decode_transfer_entry(token: Token) -> Result<RawTransfer> {
    let malformed = || ClientError::Ledger("Malformed transfer entry in contract response".into());

    let fields = match token {
        Token::Tuple(fields) if fields.len() == 6 => fields,
        _ => return Err(malformed()),
    };
    let mut fields = fields.into_iter();

    Ok(RawTransfer {
        sender: fields.next().and_then(Token::into_address).ok_or_else(malformed)?,
        receiver: fields.next().and_then(Token::into_address).ok_or_else(malformed)?,
        amount: fields.next().and_then(Token::into_uint).ok_or_else(malformed)?,
        message: fields.next().and_then(Token::into_string).ok_or_else(malformed)?,
        timestamp: fields.next().and_then(Token::into_uint).ok_or_else(malformed)?,
        keyword: fields.next().and_then(Token::into_string).ok_or_else(malformed)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(message: &str) -> Token {
        Token::Tuple(vec![
            Token::Address(Address::repeat_byte(0x11)),
            Token::Address(Address::repeat_byte(0x22)),
            Token::Uint(U256::exp10(18)),
            Token::String(message.to_string()),
            Token::Uint(U256::from(1_700_000_000u64)),
            Token::String("gm".to_string()),
        ])
    }

    #[test]
    fn selectors_derive_from_signatures() {
        assert_eq!(
            encode_get_all_transfers(),
            keccak256(b"getAllTransfers()")[..4].to_vec()
        );
        assert_eq!(
            encode_get_transfer_count(),
            keccak256(b"getTransferCount()")[..4].to_vec()
        );
    }

    #[test]
    fn record_transfer_layout() {
        let data = encode_record_transfer(
            Address::repeat_byte(0x22),
            U256::exp10(18),
            "rent",
            "house",
        );
        assert_eq!(&data[..4], &keccak256(RECORD_TRANSFER_SIG.as_bytes())[..4]);
        // selector + 4 head words + 2 dynamic strings (length word + 1 data word each)
        assert_eq!(data.len(), 4 + 4 * 32 + 2 * 2 * 32);
        // static head: receiver address right-aligned in the first word
        assert_eq!(&data[4 + 12..4 + 32], Address::repeat_byte(0x22).as_bytes());
    }

    #[test]
    fn decode_count() {
        let data = abi::encode(&[Token::Uint(U256::from(42u64))]);
        assert_eq!(decode_transfer_count(&data).unwrap(), U256::from(42u64));
    }

    #[test]
    fn decode_count_rejects_short_payload() {
        assert!(decode_transfer_count(&[0u8; 8]).is_err());
    }

    #[test]
    fn decode_transfer_list() {
        let data = abi::encode(&[Token::Array(vec![
            sample_entry("rent"),
            sample_entry("coffee"),
        ])]);
        let records = decode_transfers(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sender, Address::repeat_byte(0x11));
        assert_eq!(records[0].receiver, Address::repeat_byte(0x22));
        assert_eq!(records[0].amount, U256::exp10(18));
        assert_eq!(records[0].message, "rent");
        assert_eq!(records[1].message, "coffee");
        assert_eq!(records[1].keyword, "gm");
    }

    #[test]
    fn decode_empty_transfer_list() {
        let data = abi::encode(&[Token::Array(vec![])]);
        assert!(decode_transfers(&data).unwrap().is_empty());
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(decode_transfers(&[0xff; 16]).is_err());
    }
}
