//! Benchmarks for encode/decode throughput.
//!
//! Run with: `cargo bench`
//!
//! Groups are sized with `Throughput` so scaling behavior is visible in the
//! report: the typed-sequence and byte-array paths should be flat per byte,
//! the dictionary path is dominated by per-entry codec calls.

#![allow(missing_docs, unreachable_pub, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

mod generators {
    use lamina::bits::{Bits, Msb};
    use lamina::dictionary::Dict;
    use lamina::sequence::Seq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    pub(super) fn sequence(len: usize, seed: u64) -> Seq<u64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let items: Vec<u64> = (0..len).map(|_| rng.gen()).collect();
        Seq::try_new(items).expect("unbounded policy")
    }

    pub(super) fn bit_pattern(len: usize, seed: u64) -> Bits<Msb> {
        let mut rng = StdRng::seed_from_u64(seed);
        let pattern: Vec<bool> = (0..len).map(|_| rng.gen()).collect();
        Bits::from_bools(&pattern).expect("unbounded policy")
    }

    pub(super) fn string_dict(len: usize, seed: u64) -> Dict<String, u64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut dict = Dict::new();
        while dict.len() < len {
            let key: String = (0..12).map(|_| rng.gen_range('a'..='z')).collect();
            dict.insert(key, rng.gen());
        }
        dict
    }
}

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");
    for value in [3u64, 300, 70_000, 1 << 40, u64::MAX] {
        group.bench_with_input(BenchmarkId::new("encode", value), &value, |b, &value| {
            let mut buf = [0u8; lamina::varint::MAX_SIZE];
            b.iter(|| lamina::varint::encode_into(black_box(value), &mut buf, 0));
        });
        group.bench_with_input(BenchmarkId::new("decode", value), &value, |b, &value| {
            let mut buf = [0u8; lamina::varint::MAX_SIZE];
            lamina::varint::encode_into(value, &mut buf, 0).expect("buffer is large enough");
            b.iter(|| lamina::varint::decode_from(black_box(&buf), 0));
        });
    }
    group.finish();
}

fn bench_sequence(c: &mut Criterion) {
    use lamina::codec::{Decode, Encode};
    use lamina::sequence::Seq;

    let mut group = c.benchmark_group("sequence_u64");
    for len in [64usize, 1024, 16_384] {
        let seq = generators::sequence(len, 0xC0DE);
        let encoded = seq.encode().expect("encode");
        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", len), &seq, |b, seq| {
            b.iter(|| black_box(seq).encode());
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &encoded, |b, encoded| {
            b.iter(|| Seq::<u64>::decode(black_box(encoded)));
        });
    }
    group.finish();
}

fn bench_bits(c: &mut Criterion) {
    use lamina::bits::{Bits, Msb};
    use lamina::codec::{Decode, Encode};

    let mut group = c.benchmark_group("bits_msb");
    for len in [256usize, 4096, 65_536] {
        let bits = generators::bit_pattern(len, 0xB175);
        let encoded = bits.encode().expect("encode");
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("encode", len), &bits, |b, bits| {
            b.iter(|| black_box(bits).encode());
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &encoded, |b, encoded| {
            b.iter(|| Bits::<Msb>::decode(black_box(encoded)));
        });
    }
    group.finish();
}

fn bench_dictionary(c: &mut Criterion) {
    use lamina::codec::{Decode, Encode};
    use lamina::dictionary::Dict;

    let mut group = c.benchmark_group("dictionary_string_u64");
    for len in [16usize, 256, 4096] {
        let dict = generators::string_dict(len, 0xD1C7);
        let encoded = dict.encode().expect("encode");
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("encode", len), &dict, |b, dict| {
            b.iter(|| black_box(dict).encode());
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &encoded, |b, encoded| {
            b.iter(|| Dict::<String, u64>::decode(black_box(encoded)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_varint,
    bench_sequence,
    bench_bits,
    bench_dictionary
);
criterion_main!(benches);
