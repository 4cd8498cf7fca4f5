//! Address and network resolution backed by the `bitcoin` crate

use crate::error::{Result, SwapError};
use crate::types::*;
use bitcoin::address::NetworkUnchecked;
use bitcoin::hashes::Hash as _;
use bitcoin::{Address, WitnessVersion};

/// Resolves addresses to networks and public-key hashes
pub trait AddressResolver {
    /// Network whose address encoding matches `address`
    fn resolve_network(&self, address: &str) -> Result<Network>;

    /// 20-byte key hash carried by `address` on `network`
    fn address_to_pubkey_hash(&self, address: &str, network: Network) -> Result<PubKeyHash>;
}

impl From<Network> for bitcoin::Network {
    fn from(network: Network) -> Self {
        match network {
            Network::Bitcoin => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
            Network::Regtest => bitcoin::Network::Regtest,
        }
    }
}

/// Resolver for base58 (P2PKH) and bech32 (P2WPKH) addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitcoinLedger;

impl BitcoinLedger {
    pub fn new() -> Self {
        Self
    }
}

fn parse_address(address: &str) -> Result<Address<NetworkUnchecked>> {
    address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| SwapError::InvalidAddress(format!("{}: {}", address, e)))
}

impl AddressResolver for BitcoinLedger {
    fn resolve_network(&self, address: &str) -> Result<Network> {
        let unchecked = parse_address(address)?;
        // Testnet and regtest share base58 prefixes; the first match in
        // lookup order wins.
        Network::ALL
            .iter()
            .copied()
            .find(|n| unchecked.is_valid_for_network(bitcoin::Network::from(*n)))
            .ok_or_else(|| SwapError::UnknownNetwork(address.to_string()))
    }

    fn address_to_pubkey_hash(&self, address: &str, network: Network) -> Result<PubKeyHash> {
        let checked = parse_address(address)?
            .require_network(bitcoin::Network::from(network))
            .map_err(|e| SwapError::InvalidAddress(format!("{}: {}", address, e)))?;

        if let Some(pkh) = checked.pubkey_hash() {
            return Ok(PubKeyHash::new(pkh.to_byte_array()));
        }

        match checked.witness_program() {
            Some(program) if program.version() == WitnessVersion::V0 => {
                PubKeyHash::from_slice(program.program().as_bytes()).map_err(|_| {
                    SwapError::InvalidAddress(format!("{}: not a key hash address", address))
                })
            }
            _ => Err(SwapError::InvalidAddress(format!(
                "{}: not a key hash address",
                address
            ))),
        }
    }
}
