//! Benchmarks for the ray engine
//!
//! Run with: cargo bench -p raywave-core --bench propagation_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raywave_core::prelude::*;

fn room(walls: usize) -> Scene {
    let mut scene = Scene::new(Boundary::new(500.0, 300.0));
    scene.materials.insert(Material::fresnel("concrete", 5.0));
    for i in 0..walls {
        let x = 40.0 + (i as f64) * 420.0 / walls as f64;
        let (y1, y2) = if i % 2 == 0 { (20.0, 200.0) } else { (100.0, 280.0) };
        scene
            .add_wall(Point::new(x, y1), Point::new(x + 15.0, y2), "concrete", 1.0)
            .unwrap();
    }
    scene
}

fn bench_free_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("free_propagation");
    let config = EngineConfig::default();
    let tx = Transmitter::new(Point::new(10.0, 150.0), 1.0, 2.4e9).unwrap();

    for walls in [4usize, 16, 64].iter() {
        let scene = room(*walls);
        group.bench_with_input(BenchmarkId::new("walls", walls), walls, |b, _| {
            let mut ray = Ray::new(&tx, Vector::new(1.0, 0.3), 20).unwrap();
            b.iter(|| {
                ray.propagate(black_box(&scene.walls), &scene.boundary, &config)
                    .unwrap();
                ray.bounces().len()
            })
        });
    }

    group.finish();
}

fn bench_forced_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("forced_propagation");
    let config = EngineConfig::default();
    let mut scene = Scene::new(Boundary::new(500.0, 300.0));
    scene.materials.insert(Material::fixed("metal", 0.9));
    scene
        .add_wall(Point::new(0.0, 0.0), Point::new(500.0, 0.0), "metal", 1.0)
        .unwrap();
    scene
        .add_wall(Point::new(0.0, 300.0), Point::new(500.0, 300.0), "metal", 1.0)
        .unwrap();
    let tx = Transmitter::new(Point::new(20.0, 150.0), 1.0, 2.4e9).unwrap();
    let dest = Point::new(480.0, 120.0);
    let (bottom, top) = (&scene.walls[0], &scene.walls[1]);

    group.bench_function("two_bounces", |b| {
        let mut ray = Ray::towards(&tx, dest, 2).unwrap();
        b.iter(|| ray.propagate_to_point(black_box(dest), &[top, bottom], &config))
    });

    group.bench_function("end_coefficient", |b| {
        let mut ray = Ray::towards(&tx, dest, 2).unwrap();
        ray.propagate_to_point(dest, &[top, bottom], &config);
        b.iter(|| end_coefficient(black_box(&ray), &config))
    });

    group.finish();
}

criterion_group!(benches, bench_free_propagation, bench_forced_propagation);
criterion_main!(benches);
