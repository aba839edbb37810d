use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub mod block;
pub mod chain;
pub mod constants;
pub mod mine;

pub use block::{sealed_digest, Block, BlockDraft};
pub use chain::{Chain, TransactionSource};
pub use mine::{CancelToken, MineOutcome, Miner};

/// Lowercase hex rendering of a SHA-256 digest. The genesis sentinel `"0"`
/// is a legal value of fields typed as `Digest` even though it is not a
/// real digest.
pub type Digest = String;

pub fn sha256_hex(bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("mining cancelled before a digest matched the difficulty prefix")]
    Cancelled,
    #[error("chain already has a genesis block")]
    GenesisExists,
    #[error("chain has no genesis block to extend")]
    MissingGenesis,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub description: String,
    pub quantity: u64,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        description: impl Into<String>,
        quantity: u64,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            description: description.into(),
            quantity,
        }
    }

    /// Canonical string form used as a Merkle leaf and in block preimages:
    /// compact JSON with fields in declaration order. Changing this encoding
    /// changes every digest in the chain.
    pub fn canonical(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} (qty {})",
            self.sender, self.recipient, self.description, self.quantity
        )
    }
}

/// Clock used for block timestamps. Injectable so tests can pin time and
/// get reproducible digests.
pub trait TimeSource: Send + Sync {
    fn unix_seconds(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_secs()
    }
}

/// Fixed clock for tests and replay.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub u64);

impl TimeSource for FixedClock {
    fn unix_seconds(&self) -> u64 {
        self.0
    }
}

/// Collapse an ordered transaction list into a single root digest.
///
/// Leaves are the transactions' canonical strings. Each level pairs
/// consecutive entries and hashes `left + right` (no separator); a lone
/// leftover leaf is paired with itself. Levels above the leaves operate on
/// the hex digest strings. Empty input hashes the empty string; a single
/// leaf hashes its canonical form directly.
pub fn merkle_root(transactions: &[Transaction]) -> Digest {
    match transactions {
        [] => sha256_hex(b""),
        [only] => sha256_hex(only.canonical().as_bytes()),
        _ => {
            let mut level: Vec<String> =
                transactions.iter().map(|t| t.canonical()).collect();
            while level.len() > 1 {
                level = level
                    .chunks(2)
                    .map(|pair| {
                        let left = &pair[0];
                        let right = pair.get(1).unwrap_or(left);
                        sha256_hex(format!("{left}{right}").as_bytes())
                    })
                    .collect();
            }
            level.into_iter().next().unwrap()
        }
    }
}
