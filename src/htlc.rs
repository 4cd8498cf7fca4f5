//! Hash-time-locked contract scripts
//!
//! Lock script:
//!
//! ```text
//! OP_DUP OP_HASH160 OP_2SWAP
//! OP_IF
//!   OP_SHA256 <secret_hash> OP_EQUALVERIFY <recipient_pkh>
//! OP_ELSE
//!   <expiration> OP_CHECKLOCKTIMEVERIFY OP_2DROP <refund_pkh>
//! OP_ENDIF
//! OP_EQUALVERIFY OP_CHECKSIG
//! ```
//!
//! Unlock scripts push `<sig> <secret> OP_1 <pubkey>` (claim) or
//! `<sig> OP_0 OP_0 <pubkey>` (refund). The lock script duplicates and hashes
//! the pubkey, then OP_2SWAP brings the secret slot and branch selector to the
//! top, leaving `<sig> <pubkey> <HASH160(pubkey)>` below them. Each branch
//! pushes the expected key hash, and the shared tail compares it with the
//! computed one before checking the signature.

use crate::error::Result;
use crate::ledger::AddressResolver;
use crate::pubkey::address_to_pubkey_hash;
use crate::script::{int_push_data_len, push_bytes};
use crate::types::*;
use bitcoin::opcodes::all::{
    OP_2DROP, OP_2SWAP, OP_CHECKSIG, OP_CLTV, OP_DUP, OP_ELSE, OP_ENDIF, OP_EQUALVERIFY,
    OP_HASH160, OP_IF, OP_PUSHBYTES_0, OP_PUSHNUM_1, OP_SHA256,
};
use bitcoin::script::Builder;
use tracing::trace;

/// Fixed part of the lock script; the expiration's data bytes come on top
pub const LOCK_SCRIPT_BASE_LEN: usize = 88;

/// Script construction for one ledger's HTLC flavour
pub trait SwapScripts {
    /// Locking script paying to `recipient` with the secret, or to `refund` after `expiration`
    fn generate_lock_script(
        &self,
        recipient: &PubKeyHash,
        refund: &PubKeyHash,
        secret_hash: &SecretHash,
        expiration: Expiration,
    ) -> Result<ByteString>;

    /// Unlock data for the claim branch
    fn build_claim_unlock(&self, signature: &[u8], pubkey: &[u8], secret: &[u8]) -> Result<ByteString>;

    /// Unlock data for the refund branch
    fn build_refund_unlock(&self, signature: &[u8], pubkey: &[u8]) -> Result<ByteString>;
}

/// HTLC scripts for Bitcoin-like ledgers using OP_CHECKLOCKTIMEVERIFY
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitcoinHtlc;

impl BitcoinHtlc {
    pub fn new() -> Self {
        Self
    }

    /// Lock script from unchecked byte slices
    ///
    /// Fails with `InvalidHashLength` unless both key hashes are 20 bytes and
    /// the secret hash is 32 bytes, and with `InvalidExpiration` for negative
    /// or out-of-range expirations.
    pub fn generate_lock_script_from_slices(
        &self,
        recipient: &[u8],
        refund: &[u8],
        secret_hash: &[u8],
        expiration: i64,
    ) -> Result<ByteString> {
        let recipient = PubKeyHash::from_slice(recipient)?;
        let refund = PubKeyHash::from_slice(refund)?;
        let secret_hash = SecretHash::from_slice(secret_hash)?;
        let expiration = Expiration::new(expiration)?;
        self.generate_lock_script(&recipient, &refund, &secret_hash, expiration)
    }

    /// Lock script between two addresses
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
        let recipient = address_to_pubkey_hash(recipient_address, resolver)?;
        let refund = address_to_pubkey_hash(refund_address, resolver)?;
        self.generate_lock_script(&recipient, &refund, secret_hash, expiration)
    }

    fn build_unlock(
        &self,
        signature: &[u8],
        pubkey: &[u8],
        secret: Option<&[u8]>,
    ) -> Result<ByteString> {
        let builder = Builder::new().push_slice(push_bytes(signature)?);
        let builder = match secret {
            Some(secret) => builder.push_slice(push_bytes(secret)?).push_opcode(OP_PUSHNUM_1),
            None => builder.push_opcode(OP_PUSHBYTES_0).push_opcode(OP_PUSHBYTES_0),
        };
        Ok(builder.push_slice(push_bytes(pubkey)?).into_script().into_bytes())
    }
}

impl SwapScripts for BitcoinHtlc {
    fn generate_lock_script(
        &self,
        recipient: &PubKeyHash,
        refund: &PubKeyHash,
        secret_hash: &SecretHash,
        expiration: Expiration,
    ) -> Result<ByteString> {
        trace!(%recipient, %refund, %secret_hash, expiration = expiration.value(), "building lock script");

        let script = Builder::new()
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_opcode(OP_2SWAP)
            .push_opcode(OP_IF)
            .push_opcode(OP_SHA256)
            .push_slice(secret_hash.as_bytes())
            .push_opcode(OP_EQUALVERIFY)
            .push_slice(recipient.as_bytes())
            .push_opcode(OP_ELSE)
            .push_int(i64::from(expiration.value()))
            .push_opcode(OP_CLTV)
            .push_opcode(OP_2DROP)
            .push_slice(refund.as_bytes())
            .push_opcode(OP_ENDIF)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_CHECKSIG)
            .into_script();
        trace!(len = script.len(), "lock script assembled");
        Ok(script.into_bytes())
    }

    fn build_claim_unlock(&self, signature: &[u8], pubkey: &[u8], secret: &[u8]) -> Result<ByteString> {
        self.build_unlock(signature, pubkey, Some(secret))
    }

    fn build_refund_unlock(&self, signature: &[u8], pubkey: &[u8]) -> Result<ByteString> {
        self.build_unlock(signature, pubkey, None)
    }
}

/// Number of data bytes the expiration contributes to the lock script
pub fn expiration_data_len(expiration: Expiration) -> usize {
    int_push_data_len(i64::from(expiration.value()))
}

/// Expected lock script length for `expiration`
pub fn lock_script_len(expiration: Expiration) -> usize {
    LOCK_SCRIPT_BASE_LEN + expiration_data_len(expiration)
}
