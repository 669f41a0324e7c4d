//! Benchmarks for the local fallback tiers.
//!
//! Run with: cargo bench -p brandmark-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};

use brandmark_core::config::SyntheticConfig;
use brandmark_core::raster;
use brandmark_core::synthetic::SyntheticGenerator;
use brandmark_core::TextOptions;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 160, 255])
    }))
}

fn benchmark_quality(c: &mut Criterion) {
    let img = gradient(400, 300);

    c.bench_function("raster_quality_400x300", |b| {
        b.iter(|| {
            let _ = raster::enhance_quality(black_box(&img));
        })
    });
}

fn benchmark_style(c: &mut Criterion) {
    let img = gradient(512, 512);

    c.bench_function("raster_style_bold_512", |b| {
        b.iter(|| {
            let _ = raster::enhance_style(black_box(&img), "bold");
        })
    });
}

fn benchmark_similar(c: &mut Criterion) {
    let img = gradient(800, 400);

    c.bench_function("raster_similar_800x400", |b| {
        b.iter(|| {
            let _ = raster::similar_logo(black_box(&img));
        })
    });
}

fn benchmark_synthetic(c: &mut Criterion) {
    let generator = SyntheticGenerator::new(SyntheticConfig {
        load_system_fonts: false,
        ..SyntheticConfig::default()
    });
    let options = TextOptions::default();

    c.bench_function("synthetic_logo_400", |b| {
        b.iter(|| {
            let _ = generator.generate(black_box("A modern logo for TechStart"), &options);
        })
    });
}

fn benchmark_content_hash(c: &mut Criterion) {
    let data = vec![7u8; 1024 * 1024];

    c.bench_function("content_hash_blake3_1mb", |b| {
        b.iter(|| {
            let _ = brandmark_core::store::content_hash(black_box(&data));
        })
    });
}

criterion_group!(
    benches,
    benchmark_quality,
    benchmark_style,
    benchmark_similar,
    benchmark_synthetic,
    benchmark_content_hash,
);
criterion_main!(benches);
