/**
Brillouin-zone integration weights w[n][j] at a given Fermi energy and the
sums they are used for.
*/
pub mod bz_sum;
pub mod weight_kernel;

use ndarray::Array2;

use crate::{error::Result, mesh::Tetrahedron, sample::BandEnergies};

pub use bz_sum::{sum_energy, sum_energy_adaptive, sum_operator, BandEnergySum};
pub use weight_kernel::weight_contribs;

/**
Integration weights for every band and k-point.
# Arguments:
  * `e_fermi`: Fermi energy.
  * `tetras`: tetrahedra of the submesh.
  * `eks`: band energies on the submesh.
# Returns:
  * `Array2<f64>` indexed `[band, k-point]`; each tetrahedron adds its four
  vertex weights to the k-points it spans.
# Errors:
  * `TetrahedronOutOfRange` if `tetras` was built for a different mesh than `eks`.
*/
pub fn integration_weights(
    e_fermi: f64,
    tetras: &[Tetrahedron],
    eks: &BandEnergies,
) -> Result<Array2<f64>> {
    eks.check_tetrahedra(tetras)?;
    let num_tetra = tetras.len();
    let mut weights = Array2::zeros((eks.num_bands(), eks.num_kpoints()));
    for band in 0..eks.num_bands() {
        tetras.iter().for_each(|t| {
            let contribs = weight_contribs(e_fermi, eks.vertex_energies(t, band), num_tetra);
            t.iter()
                .zip(contribs.iter())
                .for_each(|(&k, w)| weights[[band, k]] += w);
        });
    }
    Ok(weights)
}

/**
Contribution of one tetrahedron to the weight of `band` at k-point `kpoint`.
Zero if `kpoint` is not a vertex of `tetra`.
*/
pub fn weight_contrib(
    e_fermi: f64,
    tetra: &Tetrahedron,
    eks: &BandEnergies,
    kpoint: usize,
    band: usize,
    num_tetra: usize,
) -> f64 {
    if !tetra.contains(&kpoint) {
        return 0.0;
    }
    let contribs = weight_contribs(e_fermi, eks.vertex_energies(tetra, band), num_tetra);
    tetra
        .iter()
        .zip(contribs.iter())
        .filter(|(&k, _)| k == kpoint)
        .map(|(_, w)| w)
        .sum()
}

#[cfg(test)]
mod test {
    use nalgebra::Vector3;

    use super::*;
    use crate::{
        dos::num_states_bands, error::TetraError, mesh::TetraMesh, sample::sample_energies,
    };

    fn cosine_band(k: &Vector3<f64>) -> Vec<f64> {
        let tau = 2.0 * std::f64::consts::PI;
        let e = -2.0 * ((tau * k.x).cos() + (tau * k.y).cos() + (tau * k.z).cos());
        vec![e, e + 3.0]
    }

    /// Number of tetrahedra having each k-point as a vertex.
    fn vertex_counts(tetras: &[Tetrahedron], num_kpoints: usize) -> Vec<usize> {
        let mut counts = vec![0; num_kpoints];
        tetras.iter().flatten().for_each(|&k| counts[k] += 1);
        counts
    }

    #[test]
    fn test_weights_empty_below_states() {
        let mesh = TetraMesh::new(3).unwrap();
        let eks = sample_energies(mesh.kpoints(), &cosine_band, None).unwrap();
        let weights = integration_weights(-10.0, mesh.tetrahedra(), &eks).unwrap();
        assert_eq!((2, 64), weights.dim());
        assert!(weights.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn test_weights_full_above_states() {
        let mesh = TetraMesh::new(3).unwrap();
        let eks = sample_energies(mesh.kpoints(), &cosine_band, None).unwrap();
        let weights = integration_weights(20.0, mesh.tetrahedra(), &eks).unwrap();
        let num_tetra = mesh.num_tetra() as f64;
        let counts = vertex_counts(mesh.tetrahedra(), eks.num_kpoints());
        for band in 0..2 {
            counts.iter().enumerate().for_each(|(k, &count)| {
                let expect = count as f64 / (4.0 * num_tetra);
                assert!((weights[[band, k]] - expect).abs() < 1e-15);
            });
            assert!((weights.row(band).sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_band_totals_match_occupation() {
        let mesh = TetraMesh::new(4).unwrap();
        let eks = sample_energies(mesh.kpoints(), &cosine_band, None).unwrap();
        for e_fermi in [-4.5, -1.3, 0.0, 2.2, 5.1] {
            let weights = integration_weights(e_fermi, mesh.tetrahedra(), &eks).unwrap();
            let occupation = num_states_bands(e_fermi, mesh.tetrahedra(), &eks);
            for band in 0..2 {
                assert!((weights.row(band).sum() - occupation[band]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_weight_contrib_matches_table() {
        let mesh = TetraMesh::new(2).unwrap();
        let eks = sample_energies(mesh.kpoints(), &cosine_band, None).unwrap();
        let e_fermi = -0.7;
        let tetras = mesh.tetrahedra();
        let weights = integration_weights(e_fermi, tetras, &eks).unwrap();
        for kpoint in [0, 4, 13, 26] {
            let summed: f64 = tetras
                .iter()
                .map(|t| weight_contrib(e_fermi, t, &eks, kpoint, 0, tetras.len()))
                .sum();
            assert!((summed - weights[[0, kpoint]]).abs() < 1e-14);
        }
        let outside = tetras.iter().find(|t| !t.contains(&26)).unwrap();
        assert_eq!(0.0, weight_contrib(e_fermi, outside, &eks, 26, 0, tetras.len()));
    }

    #[test]
    fn test_tetrahedra_from_other_mesh() {
        let coarse = TetraMesh::new(2).unwrap();
        let fine = TetraMesh::new(3).unwrap();
        let eks = sample_energies(coarse.kpoints(), &cosine_band, None).unwrap();
        assert!(matches!(
            integration_weights(0.0, fine.tetrahedra(), &eks),
            Err(TetraError::TetrahedronOutOfRange { num_kpoints: 27, .. })
        ));
    }
}
