use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use tileworld_common::Rect;
use tileworld_kernel::{TilePercentages, WorldGrid};
use tileworld_stream::TileWindow;

fn bench_generate(width: u32, height: u32, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(WorldGrid::generate_sized(
            black_box(width),
            black_box(height),
            "bench",
            TilePercentages::default(),
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  generate ({width}x{height}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_fixed_window(distance: u32, iterations: usize) {
    let world = WorldGrid::generate_sized(5000, 3500, "bench", TilePercentages::default());
    let anchor = Vec2::new(2500.0, 1750.0);

    let start = Instant::now();
    let mut visited = 0usize;
    for _ in 0..iterations {
        let window = TileWindow::fixed(black_box(anchor), distance, 16.0, 0.2);
        visited += window.iter().filter_map(|c| world.tile(c)).count();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  fixed window (d={distance}, {iterations} iters, {visited} tiles): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_dynamic_window(zoom: f32, iterations: usize) {
    let world = WorldGrid::generate_sized(5000, 3500, "bench", TilePercentages::default());
    let viewport = Rect::new(1000.0, 1000.0, 1280.0 / zoom, 720.0 / zoom);

    let start = Instant::now();
    let mut visited = 0usize;
    for _ in 0..iterations {
        let window = TileWindow::dynamic(black_box(viewport), 16.0, 2);
        visited += window.iter().filter_map(|c| world.tile(c)).count();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  dynamic window (zoom={zoom}, {iterations} iters, {visited} tiles): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== tileworld-stream benchmarks ===");
    println!();

    println!("[generation]");
    bench_generate(2500, 1500, 10);
    bench_generate(5000, 3500, 5);
    println!();

    println!("[fixed window]");
    for distance in [16, 32, 64, 112] {
        bench_fixed_window(distance, 200);
    }
    println!();

    println!("[dynamic window]");
    for zoom in [0.8, 1.0, 2.0, 3.0] {
        bench_dynamic_window(zoom, 200);
    }
}
