use criterion::{black_box, criterion_group, criterion_main, Criterion};
use farc::block::{compress_block, decompress_block};
use farc::Compression;

fn bench_block_codec(c: &mut Criterion) {
    let compressible = vec![b'a'; 16_384];
    let noisy: Vec<u8> = (0..16_384u32).map(|i| ((i * 2654435761) >> 24) as u8).collect();

    c.bench_function("fastlz_compress_16k_compressible", |b| {
        b.iter(|| compress_block(Compression::FastLz, black_box(&compressible)))
    });
    c.bench_function("fastlz_compress_16k_noisy", |b| {
        b.iter(|| compress_block(Compression::FastLz, black_box(&noisy)))
    });

    let compressed = compress_block(Compression::FastLz, &compressible).expect("compressible input shrinks");
    c.bench_function("fastlz_decompress_16k", |b| {
        b.iter(|| decompress_block(Compression::FastLz, black_box(&compressed), compressible.len()))
    });
}

criterion_group!(benches, bench_block_codec);
criterion_main!(benches);
