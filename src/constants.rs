//! Ledger constants used by script construction and fee estimation

/// Satoshis per BTC
pub const SATOSHIS_PER_BTC: i64 = 100_000_000;

/// Lock time threshold: lock times < this are block heights, >= are Unix timestamps
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Size of a legacy (non-segwit) signed P2PKH input in bytes
pub const INPUT_SIZE: u64 = 148;

/// Size of a standard P2PKH output in bytes
pub const OUTPUT_SIZE: u64 = 34;

/// Fixed transaction overhead: version, locktime and counts
pub const TX_OVERHEAD_SIZE: u64 = 10;

/// Smallest change output worth creating (standard P2PKH dust limit)
pub const DUST_LIMIT: i64 = 546;

/// Public key hash length: RIPEMD160(SHA256(pubkey))
pub const PUBKEY_HASH_SIZE: usize = 20;

/// Secret hash length: SHA256(secret)
pub const SECRET_HASH_SIZE: usize = 32;

/// Uncompressed public key length (0x04 || x || y)
pub const UNCOMPRESSED_PUBKEY_SIZE: usize = 65;

/// Compressed public key length (0x02/0x03 || x)
pub const COMPRESSED_PUBKEY_SIZE: usize = 33;
