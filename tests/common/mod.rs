//! Test support: keys, signing and spend checks against Bitcoin Core's interpreter

#![allow(dead_code)]

use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::serialize;
use bitcoin::hashes::Hash as _;
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Script, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use bitcoinconsensus::VERIFY_ALL_PRE_TAPROOT;
use htlc_swap::script::{p2sh_script_pubkey, p2sh_script_sig, p2wsh_script_pubkey};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

/// Value held by the swap output being spent
pub const LOCKED_VALUE: u64 = 100_000;

/// Lock time is only enforced when an input is not final
const NON_FINAL_SEQUENCE: u32 = 0xffff_fffe;

pub struct TestKey {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl TestKey {
    pub fn new(seed: u8) -> Self {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        let public = PublicKey::from_secret_key(&secp, &secret);
        Self { secret, public }
    }

    pub fn pubkey(&self) -> Vec<u8> {
        self.public.serialize().to_vec()
    }

    pub fn pubkey_hash(&self) -> htlc_swap::PubKeyHash {
        htlc_swap::pubkey::pubkey_hash(&self.public.serialize())
    }

    /// DER signature over `digest` followed by SIGHASH_ALL
    pub fn sign(&self, digest: &[u8; 32]) -> Vec<u8> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(digest).unwrap();
        let mut sig = secp.sign_ecdsa(&message, &self.secret).serialize_der().to_vec();
        sig.push(EcdsaSighashType::All.to_u32() as u8);
        sig
    }
}

/// Transaction spending the swap output at input 0 with the given lock time
pub fn spending_tx(lock_time: u32) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::from_consensus(lock_time),
        input: vec![TxIn {
            previous_output: OutPoint { txid: Txid::from_byte_array([0x11; 32]), vout: 0 },
            script_sig: ScriptBuf::new(),
            sequence: Sequence(NON_FINAL_SEQUENCE),
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::from_sat(LOCKED_VALUE - 1_000),
            script_pubkey: ScriptBuf::from_bytes(vec![0x51]),
        }],
    }
}

/// Legacy sighash for a P2SH spend, committing to the redeem script
pub fn p2sh_sighash(tx: &Transaction, lock_script: &[u8]) -> [u8; 32] {
    SighashCache::new(tx)
        .legacy_signature_hash(0, Script::from_bytes(lock_script), EcdsaSighashType::All.to_u32())
        .unwrap()
        .to_byte_array()
}

/// BIP143 sighash for a P2WSH spend of `LOCKED_VALUE`
pub fn p2wsh_sighash(tx: &Transaction, lock_script: &[u8]) -> [u8; 32] {
    SighashCache::new(tx)
        .p2wsh_signature_hash(
            0,
            Script::from_bytes(lock_script),
            Amount::from_sat(LOCKED_VALUE),
            EcdsaSighashType::All,
        )
        .unwrap()
        .to_byte_array()
}

/// Put the P2SH scriptSig on input 0 and run the P2SH output script against it
pub fn verify_p2sh_spend(
    mut tx: Transaction,
    unlock_script: &[u8],
    lock_script: &[u8],
) -> Result<(), bitcoinconsensus::Error> {
    let script_sig = p2sh_script_sig(unlock_script, lock_script).unwrap();
    tx.input[0].script_sig = ScriptBuf::from_bytes(script_sig);
    bitcoinconsensus::verify_with_flags(
        &p2sh_script_pubkey(lock_script),
        LOCKED_VALUE,
        &serialize(&tx),
        None,
        0,
        VERIFY_ALL_PRE_TAPROOT,
    )
}

/// Put the unlock items and lock script in the witness and run the P2WSH output script
pub fn verify_p2wsh_spend(
    mut tx: Transaction,
    witness_items: &[Vec<u8>],
    lock_script: &[u8],
) -> Result<(), bitcoinconsensus::Error> {
    let mut witness = Witness::from_slice(witness_items);
    witness.push(lock_script);
    tx.input[0].witness = witness;
    bitcoinconsensus::verify_with_flags(
        &p2wsh_script_pubkey(lock_script),
        LOCKED_VALUE,
        &serialize(&tx),
        None,
        0,
        VERIFY_ALL_PRE_TAPROOT,
    )
}
