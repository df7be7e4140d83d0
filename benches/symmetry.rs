use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput, BenchmarkId};
use ::zmatrix::*;

fn ring(center: Element, outer: Element, size: usize, radius: f64, bond: f64) -> Geometry {
    let position = |r: f64, k: usize| {
        let phi = std::f64::consts::TAU * k as f64 / size as f64;
        [r * phi.cos(), r * phi.sin(), 0.0]
    };
    Geometry::from_angstrom(
        (0..size).map(|k| (center, position(radius, k)))
            .chain((0..size).map(|k| (outer, position(radius + bond, k))))
    )
}

fn methane() -> Geometry {
    let a = 1.09 / 3f64.sqrt();
    Geometry::from_angstrom([
        (Element::C, [0.0, 0.0, 0.0]),
        (Element::H, [a, a, a]),
        (Element::H, [a, -a, -a]),
        (Element::H, [-a, a, -a]),
        (Element::H, [-a, -a, a]),
    ])
}

fn symmetry_numbers(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("symmetry_number");
    let tolerances = Tolerances::default();

    let molecules = [
        ("methane", methane()),
        ("benzene", ring(Element::C, Element::H, 6, 1.39, 1.09)),
        ("planar_c8h8", ring(Element::C, Element::H, 8, 1.81, 1.09)),
    ];

    for (name, geometry) in molecules {
        let orientation = Orientation::new(&geometry, &tolerances).unwrap();
        bench_group.throughput(Throughput::Elements(geometry.len() as u64));
        bench_group.bench_with_input(
            BenchmarkId::new(name, geometry.len() as u64),
            &orientation,
            |b, o| b.iter(|| o.symmetry_number(black_box(&tolerances)))
        );
    }

    bench_group.finish();
}

fn zmatrices(c: &mut Criterion) {
    let benzene = ring(Element::C, Element::H, 6, 1.39, 1.09);
    c.bench_function("benzene_zmatrix", |b| b.iter(|| {
        MolecularStructure::from_geometry(black_box(&benzene), &ForcedBonds::new(), &Tolerances::default())
    }));
}

criterion_group!(benches, symmetry_numbers, zmatrices);
criterion_main!(benches);
