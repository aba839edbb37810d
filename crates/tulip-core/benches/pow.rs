use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tulip_core::mine::{mine, CancelToken};
use tulip_core::{merkle_root, BlockDraft, Transaction};

fn bench_pow(c: &mut Criterion) {
    c.bench_function("mine_prefix_000", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let txs: Vec<Transaction> = (0..10)
            .map(|i| {
                Transaction::new(
                    format!("grower-{i}"),
                    "market",
                    "Tulip Queen of Night",
                    rng.gen_range(1..10),
                )
            })
            .collect();

        let draft = BlockDraft {
            index: 0,
            timestamp: 1_600_000_000,
            transaction_count: txs.len() as u64,
            merkle_root: merkle_root(&txs),
            previous_digest: "0".to_string(),
            transactions: txs,
        };
        let cancel = CancelToken::new();

        b.iter(|| mine(&draft, "000", &cancel));
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
