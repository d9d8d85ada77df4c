use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spectra_core::{decode_interleaved_iq, HeaderStyle, SimulatedAnalyzer, TraceDecoder};
use spectra_types::{ByteOrder, RawResponse};

fn bench_decode_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_trace");

    for points in [1_001usize, 32_001, 200_001] {
        let mut sim = SimulatedAnalyzer::new(points, 1);

        let ascii = sim.trace_ascii_response();

        group.throughput(Throughput::Elements(points as u64));

        // Прибор и хост с разным порядком байт: путь с перестановкой
        for order in [ByteOrder::Normal, ByteOrder::Swapped] {
            sim.byte_order = order;
            let raw = sim.trace_response(HeaderStyle::Definite);
            let decoder = TraceDecoder::new(order);

            group.bench_with_input(
                BenchmarkId::new(format!("real32_{order}"), points),
                &raw,
                |b, raw| {
                    b.iter(|| {
                        decoder
                            .decode_block(RawResponse::new(raw.clone()), black_box(points))
                            .unwrap()
                    })
                },
            );
        }

        group.bench_with_input(BenchmarkId::new("ascii", points), &ascii, |b, raw| {
            b.iter(|| {
                TraceDecoder::default()
                    .decode_block(RawResponse::new(raw.clone()), black_box(points))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_decode_iq(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_iq");
    group.sample_size(20);

    // Ниже и выше границы блока передачи
    for pairs in [100_000usize, 1_200_000] {
        let sim = SimulatedAnalyzer::default();
        let raw = sim.iq_response(pairs, HeaderStyle::Definite);

        group.throughput(Throughput::Elements(pairs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &raw, |b, raw| {
            b.iter(|| {
                decode_interleaved_iq(RawResponse::new(raw.clone()), black_box(pairs)).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_trace, bench_decode_iq);
criterion_main!(benches);
