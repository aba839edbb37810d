use anyhow::{bail, Result};
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tulip_core::chain::TransactionSource;
use tulip_core::{Chain, Miner, SystemClock, Transaction};

const DELIMITER: &str = "============================";

#[derive(Parser, Debug)]
#[command(name = "tulip-cli")]
#[command(about = "Builds and prints a small proof-of-work chain")]
struct Args {
    /// Total number of blocks to build, genesis included
    #[arg(long, default_value_t = 10)]
    blocks: usize,

    /// Hex prefix every sealed digest must start with
    #[arg(long, default_value = "00")]
    difficulty: String,

    /// Search the nonce space with all cores instead of one
    #[arg(long)]
    parallel: bool,

    /// Seed for the placeholder transaction feed
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

/// Placeholder payloads for the demo: the tulip trades for the genesis
/// block, then Alice/Bob and Charlie/Dave pairs with seeded quantities.
struct DemoFeed {
    rng: StdRng,
    batches: usize,
}

impl DemoFeed {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            batches: 0,
        }
    }
}

impl TransactionSource for DemoFeed {
    fn next_batch(&mut self) -> Vec<Transaction> {
        self.batches += 1;
        if self.batches == 1 {
            return vec![
                Transaction::new("Dutchgrown", "Vincent", "Tulip Bloemendaal Sunset", 10),
                Transaction::new("Keukenhof", "Anne", "Tulip Semper Augustus", 7),
            ];
        }
        vec![
            Transaction::new("Alice", "Bob", "Bitcoin", self.rng.gen_range(1..10)),
            Transaction::new("Charlie", "Dave", "Ethereum", self.rng.gen_range(1..10)),
        ]
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let args = Args::parse();
    // hex digests are lowercase; any other prefix would search forever
    if !args
        .difficulty
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        bail!("difficulty must be a lowercase hex prefix, got {:?}", args.difficulty);
    }

    println!("{DELIMITER}");
    println!();
    println!("Welcome to the tulip chain!");
    println!("Mining the genesis block and {} successors", args.blocks.saturating_sub(1));
    println!();
    println!("{DELIMITER}");

    let miner = if args.parallel {
        Miner::parallel(args.difficulty.as_str())
    } else {
        Miner::new(args.difficulty.as_str())
    };

    let mut feed = DemoFeed::new(args.seed);
    let chain = Chain::build(args.blocks, &mut feed, miner, Box::new(SystemClock))?;
    info!("built {} blocks at difficulty {:?}", chain.len(), args.difficulty);

    for block in chain.blocks() {
        println!("{}", serde_json::to_string_pretty(block)?);
        println!("{DELIMITER}");
    }
    Ok(())
}
