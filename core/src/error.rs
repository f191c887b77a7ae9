//! Domain error type for client operations.

use thiserror::Error;

/// Typed error enum for ledger-client operations, allowing callers to match
/// on specific failure modes instead of inspecting opaque `anyhow::Error`
/// messages. Every operation applies the same policy: log the cause, return
/// the typed error, recover nothing.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No wallet agent was injected. Connecting a signing agent is the only fix.
    #[error("No wallet is available. Connect a signing agent and retry.")]
    WalletAbsent,

    /// The wallet's user rejected the authorization or transaction prompt.
    #[error("Request declined by the wallet: {0}")]
    Declined(String),

    /// The amount string could not be converted to base units.
    #[error("{0}")]
    InvalidAmount(String),

    /// Operation requires state the controller does not have (e.g. no
    /// connected account at submission time).
    #[error("{0}")]
    InvalidState(String),

    /// HTTP or connection-level failure talking to the wallet/node endpoint.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The node or contract reported an error (reverted call, failed receipt,
    /// malformed response).
    #[error("{0}")]
    Ledger(String),

    /// Count-store read or write failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `std::result::Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_absent_message_names_the_fix() {
        let msg = ClientError::WalletAbsent.to_string();
        assert!(msg.contains("wallet"), "got: {msg}");
        assert!(msg.contains("signing agent"), "got: {msg}");
    }

    #[test]
    fn declined_carries_wallet_reason() {
        let err = ClientError::Declined("User rejected the request.".into());
        assert!(err.to_string().contains("User rejected"));
    }
}
