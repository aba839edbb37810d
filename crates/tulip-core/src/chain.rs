use crate::block::Block;
use crate::constants::{DEFAULT_CREATOR, DIFFICULTY_PREFIX};
use crate::mine::Miner;
use crate::{ChainError, SystemClock, TimeSource, Transaction};
use tracing::info;

/// Provider of the ordered transaction records for each new block.
pub trait TransactionSource {
    fn next_batch(&mut self) -> Vec<Transaction>;
}

/// An append-only sequence of sealed blocks. The chain is the sole writer
/// of its backing vector: it grows by one block per append call and never
/// shrinks, reorders, or rewrites an element.
pub struct Chain {
    blocks: Vec<Block>,
    miner: Miner,
    clock: Box<dyn TimeSource>,
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("blocks", &self.blocks)
            .field("miner", &self.miner)
            .finish_non_exhaustive()
    }
}

impl Chain {
    pub fn new(miner: Miner, clock: Box<dyn TimeSource>) -> Self {
        Self {
            blocks: Vec::new(),
            miner,
            clock,
        }
    }

    /// Build a chain of exactly `target_len` blocks: a genesis from the
    /// source's first batch, then successors until the length is reached.
    pub fn build(
        target_len: usize,
        source: &mut dyn TransactionSource,
        miner: Miner,
        clock: Box<dyn TimeSource>,
    ) -> Result<Self, ChainError> {
        let mut chain = Chain::new(miner, clock);
        if target_len == 0 {
            return Ok(chain);
        }
        chain.append_genesis(source.next_batch())?;
        while chain.len() < target_len {
            chain.append_next(source.next_batch(), DEFAULT_CREATOR)?;
        }
        Ok(chain)
    }

    /// Seal and insert the genesis block. Rejects a chain that already has
    /// one rather than clobbering it.
    pub fn append_genesis(
        &mut self,
        transactions: Vec<Transaction>,
    ) -> Result<&Block, ChainError> {
        if !self.blocks.is_empty() {
            return Err(ChainError::GenesisExists);
        }
        let block = Block::genesis(transactions, &self.miner, self.clock.as_ref())?;
        info!(
            "sealed block {} with nonce {} and digest {}",
            block.index(),
            block.nonce(),
            block.digest()
        );
        self.blocks.push(block);
        Ok(self.blocks.last().unwrap())
    }

    /// Seal and append the successor of the current tip.
    pub fn append_next(
        &mut self,
        transactions: Vec<Transaction>,
        creator: &str,
    ) -> Result<&Block, ChainError> {
        let previous = self.blocks.last().ok_or(ChainError::MissingGenesis)?;
        let block = Block::next(previous, transactions, creator, &self.miner, self.clock.as_ref())?;
        info!(
            "sealed block {} with nonce {} and digest {}",
            block.index(),
            block.nonce(),
            block.digest()
        );
        self.blocks.push(block);
        Ok(self.blocks.last().unwrap())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new(Miner::new(DIFFICULTY_PREFIX), Box::new(SystemClock))
    }
}
