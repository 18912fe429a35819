//! Terrain generation benchmarks.
//!
//! Run with: cargo bench -p tidescape-terrain

use std::hint::black_box;
use std::time::Instant;
use tidescape_terrain::{Noise, NoiseFunction, TerrainGenerator, TerrainOptions};

fn bench_noise(name: &str, f: NoiseFunction, samples: usize) {
    let noise = Noise::new(12398123);
    let start = Instant::now();
    let mut acc = 0.0;
    for i in 0..samples {
        let x = i as f64 * 0.013;
        acc += f.sample(&noise, black_box(x), black_box(x * 0.7));
    }
    black_box(acc);
    let elapsed = start.elapsed();
    let per_sample = elapsed / samples as u32;
    println!("  {name} ({samples} samples): {per_sample:?}/sample, total {elapsed:?}");
}

fn bench_generate(size: u32, f: NoiseFunction, iterations: usize) {
    let options = TerrainOptions {
        width: size,
        depth: size,
        noisefn: f,
        ..TerrainOptions::demo()
    };
    let generator = TerrainGenerator::new();

    let start = Instant::now();
    for _ in 0..iterations {
        let mesh = generator.generate(black_box(&options));
        black_box(mesh.triangle_count());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  {size}x{size} {f} ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_normals(size: u32, iterations: usize) {
    let options = TerrainOptions {
        width: size,
        depth: size,
        ..TerrainOptions::demo()
    };
    let mesh = TerrainGenerator::new().generate(&options);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(mesh.flat_normals());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  {size}x{size} ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Terrain Benchmarks ===\n");

    println!("Noise sampling:");
    bench_noise("wave2", NoiseFunction::Wave, 1_000_000);
    bench_noise("simplex2", NoiseFunction::Simplex, 1_000_000);
    bench_noise("perlin2", NoiseFunction::Perlin, 1_000_000);

    println!("\nMesh generation:");
    bench_generate(50, NoiseFunction::Perlin, 100);
    bench_generate(200, NoiseFunction::Perlin, 10);
    bench_generate(200, NoiseFunction::Simplex, 10);

    println!("\nFlat normals:");
    bench_normals(200, 10);

    println!("\n=== Done ===");
}
