/// Brillouin-zone sums of the tetrahedron contributions to D(E) and n(E).
use itertools_num::linspace;

use crate::{
    config::DosGridConfig, mesh::Tetrahedron, sample::BandEnergies, util::ElementWiseAddAssign,
};

use super::{
    tetra_kernel::{self, sort_energies},
    DOS,
};

/**
Contribution to D(E) from one tetrahedron and one band.
# Arguments:
  * `e`: energy.
  * `tetra`: submesh indices of the tetrahedron vertices.
  * `eks`: band energies on the submesh.
  * `band`: band index.
  * `num_tetra`: total number of tetrahedra in the mesh.
*/
pub fn dos_contrib(
    e: f64,
    tetra: &Tetrahedron,
    eks: &BandEnergies,
    band: usize,
    num_tetra: usize,
) -> f64 {
    let sorted = sort_energies(eks.vertex_energies(tetra, band));
    tetra_kernel::dos_contrib(e, &sorted, num_tetra)
}

/// Contribution to n(E) from one tetrahedron and one band.
pub fn num_states_contrib(
    e: f64,
    tetra: &Tetrahedron,
    eks: &BandEnergies,
    band: usize,
    num_tetra: usize,
) -> f64 {
    let sorted = sort_energies(eks.vertex_energies(tetra, band));
    tetra_kernel::num_states_contrib(e, &sorted, num_tetra)
}

/**
Density of states at `e` resolved by band, summed over all tetrahedra.
# Returns:
  * `Vec<f64>` of length `eks.num_bands()`.
*/
pub fn dos_bands(e: f64, tetras: &[Tetrahedron], eks: &BandEnergies) -> Vec<f64> {
    sum_per_band(tetras, eks, |t, band, num_tetra| {
        dos_contrib(e, t, eks, band, num_tetra)
    })
}

/// Integrated number of states below `e`, resolved by band.
pub fn num_states_bands(e: f64, tetras: &[Tetrahedron], eks: &BandEnergies) -> Vec<f64> {
    sum_per_band(tetras, eks, |t, band, num_tetra| {
        num_states_contrib(e, t, eks, band, num_tetra)
    })
}

/// Total density of states D(E).
pub fn density_of_states(e: f64, tetras: &[Tetrahedron], eks: &BandEnergies) -> f64 {
    dos_bands(e, tetras, eks).iter().sum()
}

/// Total integrated number of states n(E).
pub fn integrated_count(e: f64, tetras: &[Tetrahedron], eks: &BandEnergies) -> f64 {
    num_states_bands(e, tetras, eks).iter().sum()
}

/**
Calculate energy range from min, max and number of points.
*/
pub fn compute_energy_range(e_min: f64, e_max: f64, num_points: usize) -> Vec<f64> {
    linspace::<f64>(e_min, e_max, num_points).collect()
}

/**
Evaluate D(E) and n(E) on a uniform grid of `num_points` energies
between `e_min` and `e_max`.
*/
pub fn dos_spectrum(
    tetras: &[Tetrahedron],
    eks: &BandEnergies,
    e_min: f64,
    e_max: f64,
    num_points: usize,
) -> DOS {
    let energy_range = compute_energy_range(e_min, e_max, num_points);
    let dos = energy_range
        .iter()
        .map(|e| density_of_states(*e, tetras, eks))
        .collect();
    let integrated = energy_range
        .iter()
        .map(|e| integrated_count(*e, tetras, eks))
        .collect();
    DOS::new(num_points, energy_range, dos, integrated)
}

/// `dos_spectrum` over the window configured in `grid`.
pub fn dos_spectrum_on_grid(
    tetras: &[Tetrahedron],
    eks: &BandEnergies,
    grid: &DosGridConfig,
) -> DOS {
    dos_spectrum(tetras, eks, grid.e_min(), grid.e_max(), grid.num_points())
}

/**
Helper to accumulate `contrib(tetra, band, num_tetra)` over all tetrahedra,
one slot per band.
*/
fn sum_per_band<F>(tetras: &[Tetrahedron], eks: &BandEnergies, contrib: F) -> Vec<f64>
where
    F: Fn(&Tetrahedron, usize, usize) -> f64,
{
    let num_tetra = tetras.len();
    let num_bands = eks.num_bands();
    let mut per_band = vec![0.0; num_bands];
    let mut this_tetra = vec![0.0; num_bands];
    tetras.iter().for_each(|t| {
        this_tetra
            .iter_mut()
            .enumerate()
            .for_each(|(band, slot)| *slot = contrib(t, band, num_tetra));
        per_band.add_assign(&this_tetra[..]);
    });
    per_band
}
