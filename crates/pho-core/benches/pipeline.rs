//! Benchmarks for the Pho ingestion stages.
//!
//! Run with: cargo bench -p pho-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use pho_core::config::{CodecConfig, RenditionConfig};
use pho_core::pipeline::{BoundingBox, ImageCodec, Resampler};
use std::path::Path;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

fn benchmark_decode(c: &mut Criterion) {
    let codec = ImageCodec::new(CodecConfig::default());
    let path = Path::new("bench.jpg");
    let bytes = codec.encode(&gradient(1920, 1080), path).unwrap();

    c.bench_function("decode_1080p_jpeg", |b| {
        b.iter(|| {
            let _ = codec.decode(black_box(&bytes), path);
        })
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let codec = ImageCodec::new(CodecConfig::default());
    let img = gradient(960, 540);

    c.bench_function("encode_display_jpeg", |b| {
        b.iter(|| {
            let _ = codec.encode(black_box(&img), Path::new("bench.jpg"));
        })
    });
}

fn benchmark_display(c: &mut Criterion) {
    let img = gradient(1920, 1080);
    let resampler = Resampler::new(&RenditionConfig::default());

    c.bench_function("resample_display_960x720", |b| {
        b.iter(|| {
            let _ = resampler.display(black_box(&img));
        })
    });
}

fn benchmark_thumbnail(c: &mut Criterion) {
    let img = gradient(1920, 1080);

    c.bench_function("resample_thumbnail_348x464", |b| {
        b.iter(|| {
            let _ = Resampler::fit(black_box(&img), BoundingBox::new(348, 464));
        })
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_encode,
    benchmark_display,
    benchmark_thumbnail,
);
criterion_main!(benches);
