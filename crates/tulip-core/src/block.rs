use crate::constants::{GENESIS_CREATOR, GENESIS_PREVIOUS_DIGEST};
use crate::mine::{MineOutcome, Miner};
use crate::{merkle_root, ChainError, Digest, TimeSource, Transaction};
use serde::Serialize;
use sha2::{Digest as _, Sha256};

/// Derive the sealed digest for a nonce and a fixed set of block fields.
///
/// Preimage layout: nonce, index, timestamp, each transaction's canonical
/// string, transaction_count, previous_digest, merkle_root — in that order,
/// each field rendered to a string and fed as a length-prefixed record
/// (little-endian u64 byte length, then the UTF-8 bytes). The creator label
/// is display metadata and is not part of the preimage.
pub fn sealed_digest(
    nonce: u64,
    index: u64,
    timestamp: u64,
    transactions: &[Transaction],
    transaction_count: u64,
    previous_digest: &str,
    merkle_root: &str,
) -> Digest {
    let mut hasher = Sha256::new();
    update_record(&mut hasher, &nonce.to_string());
    update_record(&mut hasher, &index.to_string());
    update_record(&mut hasher, &timestamp.to_string());
    for tx in transactions {
        update_record(&mut hasher, &tx.canonical());
    }
    update_record(&mut hasher, &transaction_count.to_string());
    update_record(&mut hasher, previous_digest);
    update_record(&mut hasher, merkle_root);
    hex::encode(hasher.finalize())
}

fn update_record(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

/// The fixed block fields assembled before mining starts. This is the
/// miner's whole input; nothing in it changes while the nonce search runs.
#[derive(Clone, Debug)]
pub struct BlockDraft {
    pub index: u64,
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    pub transaction_count: u64,
    pub previous_digest: Digest,
    pub merkle_root: Digest,
}

impl BlockDraft {
    pub fn digest_with_nonce(&self, nonce: u64) -> Digest {
        sealed_digest(
            nonce,
            self.index,
            self.timestamp,
            &self.transactions,
            self.transaction_count,
            &self.previous_digest,
            &self.merkle_root,
        )
    }

    fn into_block(self, creator: String, nonce: u64, digest: Digest) -> Block {
        Block {
            index: self.index,
            timestamp: self.timestamp,
            transactions: self.transactions,
            transaction_count: self.transaction_count,
            previous_digest: self.previous_digest,
            merkle_root: self.merkle_root,
            creator,
            nonce,
            digest,
        }
    }
}

/// A sealed block. Fields are fixed before mining and never mutated after;
/// the only constructors are [`Block::genesis`] and [`Block::next`].
/// `Deserialize` is deliberately not derived so a `Block` cannot be
/// conjured around the sealing pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct Block {
    index: u64,
    timestamp: u64,
    transactions: Vec<Transaction>,
    transaction_count: u64,
    previous_digest: Digest,
    merkle_root: Digest,
    creator: String,
    nonce: u64,
    digest: Digest,
}

impl Block {
    /// Build and seal the first block: index 0, predecessor sentinel `"0"`.
    pub fn genesis(
        transactions: Vec<Transaction>,
        miner: &Miner,
        clock: &dyn TimeSource,
    ) -> Result<Self, ChainError> {
        Self::seal(
            0,
            transactions,
            GENESIS_PREVIOUS_DIGEST.to_string(),
            GENESIS_CREATOR.to_string(),
            miner,
            clock,
        )
    }

    /// Build and seal the successor of `previous`.
    pub fn next(
        previous: &Block,
        transactions: Vec<Transaction>,
        creator: &str,
        miner: &Miner,
        clock: &dyn TimeSource,
    ) -> Result<Self, ChainError> {
        Self::seal(
            previous.index + 1,
            transactions,
            previous.digest.clone(),
            creator.to_string(),
            miner,
            clock,
        )
    }

    fn seal(
        index: u64,
        transactions: Vec<Transaction>,
        previous_digest: Digest,
        creator: String,
        miner: &Miner,
        clock: &dyn TimeSource,
    ) -> Result<Self, ChainError> {
        let draft = BlockDraft {
            index,
            timestamp: clock.unix_seconds(),
            transaction_count: transactions.len() as u64,
            merkle_root: merkle_root(&transactions),
            previous_digest,
            transactions,
        };
        match miner.seal(&draft) {
            MineOutcome::Sealed { nonce, digest } => {
                Ok(draft.into_block(creator, nonce, digest))
            }
            MineOutcome::Cancelled => Err(ChainError::Cancelled),
        }
    }

    /// Recompute the sealed digest derivation for an arbitrary nonce. Pure;
    /// `block.digest_with_nonce(block.nonce()) == block.digest()` always.
    pub fn digest_with_nonce(&self, nonce: u64) -> Digest {
        sealed_digest(
            nonce,
            self.index,
            self.timestamp,
            &self.transactions,
            self.transaction_count,
            &self.previous_digest,
            &self.merkle_root,
        )
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> u64 {
        self.transaction_count
    }

    pub fn previous_digest(&self) -> &str {
        &self.previous_digest
    }

    pub fn merkle_root(&self) -> &str {
        &self.merkle_root
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}
