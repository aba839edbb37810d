use crate::block::BlockDraft;
use crate::constants::DIFFICULTY_PREFIX;
use crate::Digest;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation handle for a nonce search. Clone it, hand the clone
/// to another thread, and `cancel()` to make the search return
/// [`MineOutcome::Cancelled`].
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MineOutcome {
    Sealed { nonce: u64, digest: Digest },
    Cancelled,
}

/// Single-threaded reference search: nonce = 0, 1, 2, … until the digest's
/// hex form starts with `difficulty`. The returned nonce is the smallest
/// satisfying one. A zero-length prefix accepts nonce 0 immediately; a
/// prefix the digest alphabet cannot produce never terminates on its own,
/// so the token is the only escape hatch.
pub fn mine(draft: &BlockDraft, difficulty: &str, cancel: &CancelToken) -> MineOutcome {
    let mut nonce = 0u64;
    loop {
        if cancel.is_cancelled() {
            return MineOutcome::Cancelled;
        }
        let digest = draft.digest_with_nonce(nonce);
        if digest.starts_with(difficulty) {
            return MineOutcome::Sealed { nonce, digest };
        }
        nonce = nonce.wrapping_add(1);
    }
}

/// Parallel search over the nonce space. `find_first` keeps the leftmost
/// match, so the winning nonce is the same one [`mine`] returns.
pub fn mine_parallel(draft: &BlockDraft, difficulty: &str, cancel: &CancelToken) -> MineOutcome {
    let nonce = (0u64..u64::MAX)
        .into_par_iter()
        .find_first(|nonce| {
            cancel.is_cancelled() || draft.digest_with_nonce(*nonce).starts_with(difficulty)
        })
        .expect("nonce space exhausted (practically impossible)");

    // A cancelled search reports an arbitrary candidate; only a digest that
    // actually satisfies the prefix counts as sealed.
    let digest = draft.digest_with_nonce(nonce);
    if digest.starts_with(difficulty) {
        MineOutcome::Sealed { nonce, digest }
    } else {
        MineOutcome::Cancelled
    }
}

/// The proof-of-work component: a difficulty prefix, a cancellation token,
/// and the choice of search strategy.
#[derive(Clone, Debug)]
pub struct Miner {
    difficulty: String,
    cancel: CancelToken,
    parallel: bool,
}

impl Miner {
    /// Sequential miner for `difficulty`, with a fresh token.
    pub fn new(difficulty: impl Into<String>) -> Self {
        Self {
            difficulty: difficulty.into(),
            cancel: CancelToken::new(),
            parallel: false,
        }
    }

    /// Rayon-backed miner; same winning nonce, more cores.
    pub fn parallel(difficulty: impl Into<String>) -> Self {
        Self {
            parallel: true,
            ..Self::new(difficulty)
        }
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// Handle for cancelling searches issued by this miner.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn seal(&self, draft: &BlockDraft) -> MineOutcome {
        if self.parallel {
            mine_parallel(draft, &self.difficulty, &self.cancel)
        } else {
            mine(draft, &self.difficulty, &self.cancel)
        }
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new(DIFFICULTY_PREFIX)
    }
}
