use std::f64::consts::PI;

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use tetra_rust::{
    dos_spectrum, find_fermi_energy, integration_weights, sample_energies, TetraMesh,
};

fn cosine_bands(k: &Vector3<f64>) -> Vec<f64> {
    let tk = -2.0 * ((2.0 * PI * k.x).cos() + (2.0 * PI * k.y).cos() + (2.0 * PI * k.z).cos());
    vec![6.0 + tk, 20.0 + tk]
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mesh = TetraMesh::new(8).unwrap();
    let eks = sample_energies(mesh.kpoints(), &cosine_bands, None).unwrap();
    c.bench_function("dos spectrum", |b| {
        b.iter(|| dos_spectrum(mesh.tetrahedra(), &eks, -1.0, 27.0, 281))
    });
    c.bench_function("fermi energy", |b| {
        b.iter(|| find_fermi_energy(0.5, mesh.tetrahedra(), &eks))
    });
    c.bench_function("integration weights", |b| {
        b.iter(|| integration_weights(6.0, mesh.tetrahedra(), &eks))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
