//! Core types for swap scripts and coin selection

use crate::constants::*;
use crate::error::{Result, SwapError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hash type: 256-bit hash (transaction ids)
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Integer type (values in satoshis)
pub type Integer = i64;

/// PubKeyHash: RIPEMD160(SHA256(pubkey)), 20 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubKeyHash([u8; PUBKEY_HASH_SIZE]);

impl PubKeyHash {
    pub fn new(bytes: [u8; PUBKEY_HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, rejecting anything that is not exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; PUBKEY_HASH_SIZE] =
            bytes.try_into().map_err(|_| SwapError::InvalidHashLength {
                expected: PUBKEY_HASH_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_HASH_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for PubKeyHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PubKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// SecretHash: SHA256(secret), 32 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretHash([u8; SECRET_HASH_SIZE]);

impl SecretHash {
    pub fn new(bytes: [u8; SECRET_HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, rejecting anything that is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SECRET_HASH_SIZE] =
            bytes.try_into().map_err(|_| SwapError::InvalidHashLength {
                expected: SECRET_HASH_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Hash a secret preimage
    pub fn from_secret(secret: &[u8]) -> Self {
        Self(Sha256::digest(secret).into())
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_HASH_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for SecretHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Expiration: absolute lock time of the refund path
///
/// Values below `LOCKTIME_THRESHOLD` are block heights, values at or above it
/// are Unix timestamps. The value must fit the 32-bit lock-time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Expiration(u32);

impl Expiration {
    /// Build from a signed value, rejecting negatives and values above `u32::MAX`
    pub fn new(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(SwapError::InvalidExpiration(format!(
                "negative expiration {}",
                value
            )));
        }
        let value = u32::try_from(value).map_err(|_| {
            SwapError::InvalidExpiration(format!("expiration {} exceeds lock time range", value))
        })?;
        Ok(Self(value))
    }

    pub fn from_block_height(height: u32) -> Result<Self> {
        if height >= LOCKTIME_THRESHOLD {
            return Err(SwapError::InvalidExpiration(format!(
                "block height {} is not below the lock time threshold",
                height
            )));
        }
        Ok(Self(height))
    }

    pub fn from_timestamp(timestamp: u32) -> Result<Self> {
        if timestamp < LOCKTIME_THRESHOLD {
            return Err(SwapError::InvalidExpiration(format!(
                "timestamp {} is below the lock time threshold",
                timestamp
            )));
        }
        Ok(Self(timestamp))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_block_height(&self) -> bool {
        self.0 < LOCKTIME_THRESHOLD
    }

    pub fn is_timestamp(&self) -> bool {
        !self.is_block_height()
    }
}

impl From<u32> for Expiration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// UTXO: a spendable output identified by (txid, vout)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: Hash,
    pub vout: u32,
    pub value: Integer,
}

impl Utxo {
    pub fn same_outpoint(&self, other: &Utxo) -> bool {
        self.txid == other.txid && self.vout == other.vout
    }
}

/// Target: a required payment output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub script_pubkey: ByteString,
    pub value: Integer,
}

/// Output of a selection; `script_pubkey: None` marks the change output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub script_pubkey: Option<ByteString>,
    pub value: Integer,
}

impl Output {
    pub fn change(value: Integer) -> Self {
        Self { script_pubkey: None, value }
    }

    pub fn is_change(&self) -> bool {
        self.script_pubkey.is_none()
    }
}

impl From<&Target> for Output {
    fn from(target: &Target) -> Self {
        Self {
            script_pubkey: Some(target.script_pubkey.clone()),
            value: target.value,
        }
    }
}

/// SelectionResult: Σ inputs = Σ outputs + fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Chosen inputs, pinned inputs first
    pub inputs: Vec<Utxo>,
    /// Targets in request order, followed by change if any
    pub outputs: Vec<Output>,
    pub fee: Integer,
}

impl SelectionResult {
    pub fn input_value(&self) -> Integer {
        self.inputs.iter().map(|u| u.value).sum()
    }

    pub fn output_value(&self) -> Integer {
        self.outputs.iter().map(|o| o.value).sum()
    }

    pub fn change(&self) -> Option<&Output> {
        self.outputs.iter().find(|o| o.is_change())
    }
}

/// Supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Bitcoin,
    Testnet,
    Regtest,
}

impl Network {
    /// Lookup order used when resolving an address
    pub const ALL: [Network; 3] = [Network::Bitcoin, Network::Testnet, Network::Regtest];
}

/// Address types a swap output can be locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressType {
    /// P2SH
    Legacy,
    /// P2SH-wrapped P2WSH
    P2shSegwit,
    /// Native P2WSH
    Bech32,
}

impl AddressType {
    pub const ALL: [AddressType; 3] = [
        AddressType::Legacy,
        AddressType::P2shSegwit,
        AddressType::Bech32,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Legacy => "legacy",
            AddressType::P2shSegwit => "p2sh-segwit",
            AddressType::Bech32 => "bech32",
        }
    }
}
