use std::hint::black_box;

use bytes::Bytes;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use offload_bench::codec;
use offload_bench::pool::CompressPool;

// Payloads per iteration, each PAYLOAD_LEN bytes
const PAYLOADS: usize = 16;
const PAYLOAD_LEN: usize = 64 * 1024;

fn payloads() -> Vec<Bytes> {
    (0..PAYLOADS)
        .map(|i| {
            let data: Vec<u8> = (0..PAYLOAD_LEN).map(|j| ((i * 31 + j / 7) % 251) as u8).collect();
            Bytes::from(data)
        })
        .collect()
}

/// Inline round trips against a pool of each size, moved and copied.
fn bench_round_trip(c: &mut Criterion) {
    let payloads = payloads();
    let mut group = c.benchmark_group("deflate/round_trip");
    group.throughput(Throughput::Bytes((PAYLOADS * PAYLOAD_LEN) as u64));

    group.bench_function("inline", |b| {
        b.iter(|| {
            for payload in &payloads {
                black_box(codec::round_trip(payload, codec::DEFAULT_LEVEL).unwrap());
            }
        });
    });

    for workers in [1, 2, 4, 8] {
        let pool = CompressPool::with_level(workers, codec::DEFAULT_LEVEL).unwrap();
        for transferable in [true, false] {
            let mode = if transferable { "transfer" } else { "copy" };
            group.bench_function(format!("workers/{workers}/{mode}"), |b| {
                b.iter(|| {
                    let tickets: Vec<_> = payloads
                        .iter()
                        .map(|p| pool.submit_bytes(p.clone(), transferable).unwrap())
                        .collect();
                    for ticket in tickets {
                        black_box(ticket.wait().unwrap());
                    }
                });
            });
        }
        pool.destroy();
    }

    group.finish();
}

criterion_group!(benches, bench_round_trip);
criterion_main!(benches);
