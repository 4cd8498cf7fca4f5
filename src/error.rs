//! Error types for swap script construction and coin selection

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Invalid hash length: expected {expected} bytes, got {actual}")]
    InvalidHashLength { expected: usize, actual: usize },

    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid UTXO: {0}")]
    InvalidUtxo(String),

    #[error("Invalid fee rate: {0}")]
    InvalidFeeRate(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Push data too large: {0} bytes")]
    PushTooLarge(usize),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("No known network for address: {0}")]
    UnknownNetwork(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, SwapError>;
