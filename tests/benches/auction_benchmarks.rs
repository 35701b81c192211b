//! # Auction Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Ranking pass (per tick) | < 1ms at 1 000 bids |
//! | Result digest | < 100µs at 1 000 transactions |

use chrono::{Duration as ChronoDuration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use tob_auction::{rank, report_data, AuctionInfo, AuctionState, Bid, Transaction};

fn make_bids(count: usize) -> Vec<Bid> {
    (0..count)
        .map(|i| {
            // Spread amounts with plenty of ties
            let amount = ((i * 7919) % 97) as i64;
            Bid::new(1, "bench", format!("0x{i:040x}"), amount)
                .with_transactions([format!("tx-{i}-0"), format!("tx-{i}-1")])
        })
        .collect()
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    group.measurement_time(Duration::from_secs(5));

    for size in [10, 100, 1_000, 10_000] {
        let bids = make_bids(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("rank", size), &bids, |b, bids| {
            b.iter(|| black_box(rank(black_box(bids))))
        });
    }

    group.finish();
}

fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    for size in [10, 1_000] {
        let tob: Vec<Transaction> = (0..size).map(|i| Transaction::new(format!("tx-{i}"))).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("report_data", size), &tob, |b, tob| {
            b.iter(|| black_box(report_data(1, "bench", black_box(tob))))
        });
    }

    group.finish();
}

fn bench_state_snapshot(c: &mut Criterion) {
    let now = Utc::now();
    let info = AuctionInfo::new("bench", 1, now, now + ChronoDuration::seconds(2));
    let mut state = AuctionState::new(info);
    state.bids = make_bids(1_000);
    state.tob = rank(&state.bids).tob;

    c.bench_function("state_snapshot_1000_bids", |b| {
        b.iter(|| black_box(state.clone()))
    });
}

criterion_group!(benches, bench_ranking, bench_digest, bench_state_snapshot);
criterion_main!(benches);
