//! # htlc-swap
//!
//! Hash-time-locked contract scripts and coin selection for atomic swaps on
//! Bitcoin-like ledgers.
//!
//! This crate provides pure, side-effect-free functions that build the locking
//! script of a swap output, the two unlocking scripts that spend it (claim with
//! the secret, refund after expiration), and the fee model and coin selection
//! used to fund such outputs.
//!
//! ## Architecture
//!
//! - `htlc`: lock script and spend-path builders behind the `SwapScripts` capability
//! - `selection`: pinned/accumulative and change-avoiding coin selection
//! - `fee`: static linear fee model
//! - `pubkey`: key compression, HASH160 and address resolution
//! - `script`: minimal pushes, script numbers, P2SH/P2WSH wrapping
//! - `ledger`, `tx_view`: narrow adapters over the `bitcoin` crate
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: identical inputs always produce byte-identical scripts
//! 2. **Byte Exactness**: every push is minimal, every number minimally encoded
//! 3. **Exact Version Pinning**: script-critical dependencies pinned to exact versions
//! 4. **No Script Interpretation**: scripts are built, never executed
//!
//! ## Usage
//!
//! ```rust
//! use htlc_swap::SwapKit;
//! use htlc_swap::types::*;
//!
//! let kit = SwapKit::new();
//! let lock_script = kit.generate_lock_script(
//!     &PubKeyHash::new([0x11; 20]),
//!     &PubKeyHash::new([0x22; 20]),
//!     &SecretHash::from_secret(b"secret"),
//!     Expiration::from(800_000),
//! ).unwrap();
//! assert_eq!(lock_script.len(), 91);
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod script;
pub mod fee;
pub mod selection;
pub mod pubkey;
pub mod htlc;
pub mod ledger;
pub mod tx_view;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{SwapError, Result};
pub use htlc::{BitcoinHtlc, SwapScripts};
pub use ledger::{AddressResolver, BitcoinLedger};
pub use selection::{CoinSelector, SelectorConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main swap toolkit
///
/// Stateless apart from the selector configuration; every method is a pure
/// function of its arguments.
///
/// # Examples
///
/// ```
/// use htlc_swap::SwapKit;
///
/// let kit = SwapKit::new();
/// assert_eq!(kit.estimate_fee(2, 1, 10.0).unwrap(), 3400);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapKit {
    htlc: BitcoinHtlc,
    selector: CoinSelector,
}

impl SwapKit {
    /// Create a toolkit with the default selector configuration
    ///
    /// # Examples
    ///
    /// ```
    /// use htlc_swap::SwapKit;
    ///
    /// let kit = SwapKit::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a toolkit with a custom selector configuration
    pub fn with_selector_config(config: SelectorConfig) -> Self {
        Self {
            htlc: BitcoinHtlc::new(),
            selector: CoinSelector::with_config(config),
        }
    }

    /// Estimate the fee of a legacy transaction
    ///
    /// # Examples
    ///
    /// ```
    /// use htlc_swap::SwapKit;
    ///
    /// let kit = SwapKit::new();
    /// // (1*148 + 2*34 + 10) * 5
    /// assert_eq!(kit.estimate_fee(1, 2, 5.0).unwrap(), 1130);
    /// // Fractional rates round up
    /// assert_eq!(kit.estimate_fee(1, 2, 4.1).unwrap(), 1130);
    /// ```
    pub fn estimate_fee(&self, num_inputs: usize, num_outputs: usize, fee_rate: f64) -> Result<Integer> {
        fee::estimate_fee(num_inputs, num_outputs, fee_rate)
    }

    /// Select inputs for `targets`, spending every `pinned` input
    ///
    /// # Examples
    ///
    /// ```
    /// use htlc_swap::SwapKit;
    /// use htlc_swap::types::*;
    ///
    /// let kit = SwapKit::new();
    /// let htlc_output = Utxo { txid: [7; 32], vout: 0, value: 20_000 };
    /// let wallet = vec![Utxo { txid: [1; 32], vout: 1, value: 500_000 }];
    /// let targets = vec![Target { script_pubkey: vec![0x51], value: 100_000 }];
    ///
    /// let result = kit.select(&wallet, &targets, 2.0, &[htlc_output.clone()]).unwrap();
    /// assert_eq!(result.inputs[0], htlc_output);
    /// assert_eq!(result.input_value(), result.output_value() + result.fee);
    /// ```
    pub fn select(
        &self,
        utxos: &[Utxo],
        targets: &[Target],
        fee_rate: f64,
        pinned: &[Utxo],
    ) -> Result<SelectionResult> {
        self.selector.select(utxos, targets, fee_rate, pinned)
    }

    /// Build the HTLC lock script
    pub fn generate_lock_script(
        &self,
        recipient: &PubKeyHash,
        refund: &PubKeyHash,
        secret_hash: &SecretHash,
        expiration: Expiration,
    ) -> Result<ByteString> {
        self.htlc.generate_lock_script(recipient, refund, secret_hash, expiration)
    }

    /// Build the HTLC lock script between two addresses
    ///
    /// # Examples
    ///
    /// ```
    /// use htlc_swap::{BitcoinLedger, SwapKit};
    /// use htlc_swap::types::*;
    ///
    /// let kit = SwapKit::new();
    /// let script = kit.generate_swap(
    ///     "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
    ///     "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
    ///     &SecretHash::from_secret(b"secret"),
    ///     Expiration::from(800_000),
    ///     &BitcoinLedger::new(),
    /// ).unwrap();
    /// assert_eq!(script.len(), 91);
    /// ```
    pub fn generate_swap<R>(
        &self,
        recipient_address: &str,
        refund_address: &str,
        secret_hash: &SecretHash,
        expiration: Expiration,
        resolver: &R,
    ) -> Result<ByteString>
    where
        R: AddressResolver + ?Sized,
    {
        self.htlc
            .generate_swap(recipient_address, refund_address, secret_hash, expiration, resolver)
    }

    /// Build the claim unlock script
    ///
    /// # Examples
    ///
    /// ```
    /// use htlc_swap::SwapKit;
    ///
    /// let kit = SwapKit::new();
    /// let unlock = kit.build_claim_unlock(&[0x30; 71], &[0x02; 33], &[0x42; 32]).unwrap();
    /// // <71 sig> <32 secret> OP_1 <33 pubkey>
    /// assert_eq!(unlock.len(), 1 + 71 + 1 + 32 + 1 + 1 + 33);
    /// ```
    pub fn build_claim_unlock(&self, signature: &[u8], pubkey: &[u8], secret: &[u8]) -> Result<ByteString> {
        self.htlc.build_claim_unlock(signature, pubkey, secret)
    }

    /// Build the refund unlock script
    ///
    /// # Examples
    ///
    /// ```
    /// use htlc_swap::SwapKit;
    ///
    /// let kit = SwapKit::new();
    /// let unlock = kit.build_refund_unlock(&[0x30; 71], &[0x02; 33]).unwrap();
    /// // <71 sig> OP_0 OP_0 <33 pubkey>
    /// assert_eq!(unlock.len(), 1 + 71 + 1 + 1 + 1 + 33);
    /// ```
    pub fn build_refund_unlock(&self, signature: &[u8], pubkey: &[u8]) -> Result<ByteString> {
        self.htlc.build_refund_unlock(signature, pubkey)
    }

    /// Compress a public key
    pub fn compress_pubkey(&self, pubkey: &[u8]) -> Result<[u8; COMPRESSED_PUBKEY_SIZE]> {
        crate::pubkey::compress_pubkey(pubkey)
    }

    /// Decode a raw transaction for inspection
    pub fn decode_raw_transaction(&self, raw_hex: &str, network: Network) -> Result<tx_view::TransactionView> {
        tx_view::decode_raw_transaction(raw_hex, network)
    }
}
