//! Public key compression and hashing

use crate::constants::*;
use crate::error::{Result, SwapError};
use crate::ledger::AddressResolver;
use crate::script::hash160;
use crate::types::*;
use secp256k1::PublicKey;

/// Compress a secp256k1 public key
///
/// Accepts a 65-byte uncompressed key (`04 || x || y`) or a 33-byte
/// compressed key. The result is `02 || x` for even y, `03 || x` for odd y.
/// The point must lie on the curve.
pub fn compress_pubkey(pubkey: &[u8]) -> Result<[u8; COMPRESSED_PUBKEY_SIZE]> {
    match (pubkey.len(), pubkey.first().copied()) {
        (UNCOMPRESSED_PUBKEY_SIZE, Some(0x04)) => {}
        (COMPRESSED_PUBKEY_SIZE, Some(0x02 | 0x03)) => {}
        (len, prefix) => {
            return Err(SwapError::InvalidPublicKey(format!(
                "unexpected length {} with prefix {:?}",
                len, prefix
            )));
        }
    }

    PublicKey::from_slice(pubkey)
        .map(|pk| pk.serialize())
        .map_err(|e| SwapError::InvalidPublicKey(e.to_string()))
}

/// HASH160 of a serialized public key
pub fn pubkey_hash(pubkey: &[u8]) -> PubKeyHash {
    PubKeyHash::new(hash160(pubkey))
}

/// Resolve an address to its public-key hash through `resolver`
pub fn address_to_pubkey_hash<R>(address: &str, resolver: &R) -> Result<PubKeyHash>
where
    R: AddressResolver + ?Sized,
{
    let network = resolver.resolve_network(address)?;
    resolver.address_to_pubkey_hash(address, network)
}
