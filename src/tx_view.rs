//! Read-only view of a raw transaction

use crate::constants::*;
use crate::error::{Result, SwapError};
use crate::types::*;
use bitcoin::consensus::encode::deserialize;
use bitcoin::{Address, Script, Transaction, TxIn, TxOut};
use serde::{Deserialize, Serialize};

/// Output script classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    Pubkey,
    Pubkeyhash,
    Scripthash,
    WitnessV0Keyhash,
    WitnessV0Scripthash,
    WitnessV1Taproot,
    Nulldata,
    Nonstandard,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Pubkey => "pubkey",
            OutputType::Pubkeyhash => "pubkeyhash",
            OutputType::Scripthash => "scripthash",
            OutputType::WitnessV0Keyhash => "witness_v0_keyhash",
            OutputType::WitnessV0Scripthash => "witness_v0_scripthash",
            OutputType::WitnessV1Taproot => "witness_v1_taproot",
            OutputType::Nulldata => "nulldata",
            OutputType::Nonstandard => "nonstandard",
        }
    }

    /// Signatures needed to spend; zero for unspendable or unknown scripts
    pub fn required_signatures(&self) -> u32 {
        match self {
            OutputType::Nulldata | OutputType::Nonstandard => 0,
            _ => 1,
        }
    }
}

/// Classify an output script
pub fn classify_output(script_pubkey: &[u8]) -> OutputType {
    let script = Script::from_bytes(script_pubkey);
    if script.is_p2pkh() {
        OutputType::Pubkeyhash
    } else if script.is_p2sh() {
        OutputType::Scripthash
    } else if script.is_p2wpkh() {
        OutputType::WitnessV0Keyhash
    } else if script.is_p2wsh() {
        OutputType::WitnessV0Scripthash
    } else if script.is_p2tr() {
        OutputType::WitnessV1Taproot
    } else if script.is_op_return() {
        OutputType::Nulldata
    } else if script.is_p2pk() {
        OutputType::Pubkey
    } else {
        OutputType::Nonstandard
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptView {
    pub asm: String,
    pub hex: String,
}

impl ScriptView {
    fn new(script: &Script) -> Self {
        Self {
            asm: script.to_asm_string(),
            hex: hex::encode(script.as_bytes()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputView {
    pub txid: String,
    pub vout: u32,
    pub script_sig: ScriptView,
    pub txinwitness: Vec<String>,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKeyView {
    pub asm: String,
    pub hex: String,
    pub req_sigs: u32,
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputView {
    /// Value in BTC
    pub value: f64,
    /// Same value in satoshis, exact
    pub value_sat: u64,
    pub n: usize,
    pub script_pubkey: ScriptPubKeyView,
}

/// Decoded transaction, laid out like a node's `decoderawtransaction` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub txid: String,
    /// Witness transaction id
    pub hash: String,
    pub version: i32,
    pub locktime: u32,
    pub size: usize,
    pub vsize: usize,
    pub weight: u64,
    pub vin: Vec<InputView>,
    pub vout: Vec<OutputView>,
    pub hex: String,
}

/// Decode a hex-encoded raw transaction
///
/// Output addresses are rendered for `network` when the script maps to one.
pub fn decode_raw_transaction(raw_hex: &str, network: Network) -> Result<TransactionView> {
    let raw_hex = raw_hex.trim();
    let bytes =
        hex::decode(raw_hex).map_err(|e| SwapError::Decode(format!("invalid hex: {}", e)))?;
    let tx: Transaction =
        deserialize(&bytes).map_err(|e| SwapError::Decode(format!("invalid transaction: {}", e)))?;

    let network = bitcoin::Network::from(network);
    Ok(TransactionView {
        txid: tx.compute_txid().to_string(),
        hash: tx.compute_wtxid().to_string(),
        version: tx.version.0,
        locktime: tx.lock_time.to_consensus_u32(),
        size: tx.total_size(),
        vsize: tx.vsize(),
        weight: tx.weight().to_wu(),
        vin: tx.input.iter().map(input_view).collect(),
        vout: tx
            .output
            .iter()
            .enumerate()
            .map(|(n, output)| output_view(n, output, network))
            .collect(),
        hex: raw_hex.to_lowercase(),
    })
}

fn input_view(input: &TxIn) -> InputView {
    InputView {
        txid: input.previous_output.txid.to_string(),
        vout: input.previous_output.vout,
        script_sig: ScriptView::new(&input.script_sig),
        txinwitness: input.witness.iter().map(hex::encode).collect(),
        sequence: input.sequence.0,
    }
}

fn output_view(n: usize, output: &TxOut, network: bitcoin::Network) -> OutputView {
    let script = output.script_pubkey.as_script();
    let output_type = classify_output(script.as_bytes());
    let addresses = Address::from_script(script, network)
        .map(|address| vec![address.to_string()])
        .unwrap_or_default();
    let view = ScriptView::new(script);
    let value_sat = output.value.to_sat();

    OutputView {
        value: value_sat as f64 / SATOSHIS_PER_BTC as f64,
        value_sat,
        n,
        script_pubkey: ScriptPubKeyView {
            asm: view.asm,
            hex: view.hex,
            req_sigs: output_type.required_signatures(),
            output_type,
            addresses,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{p2sh_script_pubkey, p2wsh_script_pubkey};
    use bitcoin::hashes::Hash as _;
    use bitcoin::{PubkeyHash, ScriptBuf, WPubkeyHash};

    #[test]
    fn test_classify_output() {
        let p2pkh = ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array([0; 20]));
        assert_eq!(classify_output(p2pkh.as_bytes()), OutputType::Pubkeyhash);

        assert_eq!(classify_output(&p2sh_script_pubkey(&[0x51])), OutputType::Scripthash);
        assert_eq!(
            classify_output(&p2wsh_script_pubkey(&[0x51])),
            OutputType::WitnessV0Scripthash
        );

        let p2wpkh = ScriptBuf::new_p2wpkh(&WPubkeyHash::from_byte_array([0; 20]));
        assert_eq!(classify_output(p2wpkh.as_bytes()), OutputType::WitnessV0Keyhash);

        assert_eq!(classify_output(&[0x6a, 0x01, 0x00]), OutputType::Nulldata);
        assert_eq!(classify_output(&[0x51]), OutputType::Nonstandard);
    }

    #[test]
    fn test_output_type_names_match_serde() {
        for output_type in [
            OutputType::Pubkey,
            OutputType::Pubkeyhash,
            OutputType::Scripthash,
            OutputType::WitnessV0Keyhash,
            OutputType::WitnessV0Scripthash,
            OutputType::WitnessV1Taproot,
            OutputType::Nulldata,
            OutputType::Nonstandard,
        ] {
            let json = serde_json::to_string(&output_type).unwrap();
            assert_eq!(json, format!("\"{}\"", output_type.as_str()));
        }
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        assert!(matches!(
            decode_raw_transaction("zz", Network::Bitcoin),
            Err(SwapError::Decode(_))
        ));
        assert!(matches!(
            decode_raw_transaction("00", Network::Bitcoin),
            Err(SwapError::Decode(_))
        ));
    }
}
