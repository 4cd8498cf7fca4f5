//! Script helpers: bounded pushes, expiration widths and output wrapping
//!
//! Script assembly goes through `bitcoin::script::Builder`, which already
//! picks the minimal push opcode for data and the minimal script-number
//! encoding for integers.

use crate::constants::PUBKEY_HASH_SIZE;
use crate::error::{Result, SwapError};
use crate::types::*;
use bitcoin::hashes::{hash160, Hash as _};
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::{Script, ScriptBuf};

/// Largest push this crate emits (an OP_PUSHDATA2 payload)
pub const MAX_PUSH_SIZE: usize = u16::MAX as usize;

/// Copy `data` into a push operand, rejecting anything past OP_PUSHDATA2
pub fn push_bytes(data: &[u8]) -> Result<PushBytesBuf> {
    if data.len() > MAX_PUSH_SIZE {
        return Err(SwapError::PushTooLarge(data.len()));
    }
    PushBytesBuf::try_from(data.to_vec()).map_err(|_| SwapError::PushTooLarge(data.len()))
}

/// Data bytes an integer push carries
///
/// Zero for OP_0 and OP_1..OP_16, otherwise the length of the minimal
/// script number. An expiration never needs more than 5.
pub fn int_push_data_len(value: i64) -> usize {
    let pushed = Builder::new().push_int(value).len();
    pushed.saturating_sub(1)
}

/// HASH160: RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; PUBKEY_HASH_SIZE] {
    hash160::Hash::hash(data).to_byte_array()
}

/// P2SH output: OP_HASH160 <HASH160(script)> OP_EQUAL
pub fn p2sh_script_pubkey(redeem_script: &[u8]) -> ByteString {
    ScriptBuf::new_p2sh(&Script::from_bytes(redeem_script).script_hash()).into_bytes()
}

/// P2WSH output: OP_0 <SHA256(script)>
pub fn p2wsh_script_pubkey(witness_script: &[u8]) -> ByteString {
    ScriptBuf::new_p2wsh(&Script::from_bytes(witness_script).wscript_hash()).into_bytes()
}

/// P2SH-wrapped P2WSH output: the P2SH of the P2WSH program
pub fn p2sh_p2wsh_script_pubkey(witness_script: &[u8]) -> ByteString {
    p2sh_script_pubkey(&p2wsh_script_pubkey(witness_script))
}

/// scriptSig for a P2SH spend: the unlock pushes followed by a push of the redeem script
pub fn p2sh_script_sig(unlock_script: &[u8], redeem_script: &[u8]) -> Result<ByteString> {
    Ok(Builder::from(unlock_script.to_vec())
        .push_slice(push_bytes(redeem_script)?)
        .into_script()
        .into_bytes())
}

impl AddressType {
    /// Output script locking funds to `lock_script` under this address type
    pub fn lock_script_pubkey(&self, lock_script: &[u8]) -> ByteString {
        match self {
            AddressType::Legacy => p2sh_script_pubkey(lock_script),
            AddressType::P2shSegwit => p2sh_p2wsh_script_pubkey(lock_script),
            AddressType::Bech32 => p2wsh_script_pubkey(lock_script),
        }
    }
}
