/**
Brillouin-zone sums sum_n sum_k w[n][k] X_n(k) over the integration weights.
*/
use nalgebra::Matrix3;
use ndarray::{Array2, ArrayView2};
use tracing::{info, warn};

use crate::{
    config::{FermiSolverConfig, TetraConfig},
    error::{Result, TetraError},
    fermi::find_fermi_energy_with,
    mesh::{LatticeOrientation, TetraMesh},
    sample::{BandEnergies, EnergyProvider, OperatorTable},
};

use super::integration_weights;

/**
Band energy sum_n sum_k w[n][k] E_n(k), the mesh density it was converged at
and the weights used for it.
*/
#[derive(Debug, Clone)]
pub struct BandEnergySum {
    energy: f64,
    mesh_density: usize,
    weights: Array2<f64>,
}

impl BandEnergySum {
    pub fn new(energy: f64, mesh_density: usize, weights: Array2<f64>) -> Self {
        Self {
            energy,
            mesh_density,
            weights,
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn mesh_density(&self) -> usize {
        self.mesh_density
    }

    /// Weights indexed `[band, k-point]`.
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }
}

/**
sum_n sum_k w[n][k] X_n(k).
# Arguments:
  * `weights`: indexed `[band, k-point]`, from `integration_weights`.
  * `xks`: operator values indexed `[k-point, band]` on the same submesh.
# Errors:
  * `TableShapeMismatch` if the two tables do not describe the same bands and k-points.
*/
pub fn sum_operator(weights: &Array2<f64>, xks: &OperatorTable) -> Result<f64> {
    weighted_sum(weights, xks.values())
}

/// Band energy sum_n sum_k w[n][k] E_n(k).
pub fn sum_energy(weights: &Array2<f64>, eks: &BandEnergies) -> Result<f64> {
    weighted_sum(weights, eks.energies())
}

fn weighted_sum(weights: &Array2<f64>, table: ArrayView2<'_, f64>) -> Result<f64> {
    if weights.dim() != (table.ncols(), table.nrows()) {
        return Err(TetraError::TableShapeMismatch {
            weights: weights.dim(),
            table: table.dim(),
        });
    }
    Ok(weights
        .iter()
        .zip(table.t().iter())
        .map(|(w, x)| w * x)
        .sum())
}

/**
Band energy converged by doubling the mesh density.
At each density E_F is solved for `num_electrons`, the weights are built at
that E_F and the band energy is summed; refinement stops once successive band
energies differ by less than `tolerance`.
# Arguments:
  * `n0`: initial mesh density.
  * `provider`: band energies in the basis of `recip_basis`.
  * `recip_basis`: reciprocal lattice vectors as rows.
  * `num_electrons`: target state count.
  * `tolerance`: convergence threshold on the band energy, falling back to
  `config.refinement().tolerance()`; if both are `None` the result at `n0` is returned.
  * `config`: bisection settings and the refinement cap.
# Errors:
  * `RefinementNotConverged` after `config.refinement().max_refinements()` doublings.
*/
pub fn sum_energy_adaptive<P: EnergyProvider + ?Sized>(
    n0: usize,
    provider: &P,
    recip_basis: &Matrix3<f64>,
    num_electrons: f64,
    tolerance: Option<f64>,
    config: &TetraConfig,
) -> Result<BandEnergySum> {
    let orientation = LatticeOrientation::optimize(recip_basis);
    let mut current =
        band_energy_at_density(n0, provider, &orientation, num_electrons, config.fermi())?;
    info!(mesh_density = n0, energy = current.energy, "initial band energy");
    let tolerance = match tolerance.or(config.refinement().tolerance()) {
        Some(tol) => tol,
        None => return Ok(current),
    };
    for _ in 0..config.refinement().max_refinements() {
        let n = current.mesh_density * 2;
        let refined =
            band_energy_at_density(n, provider, &orientation, num_electrons, config.fermi())?;
        let change = (refined.energy - current.energy).abs();
        info!(mesh_density = n, energy = refined.energy, change, "refined band energy");
        current = refined;
        if change < tolerance {
            return Ok(current);
        }
    }
    warn!(
        mesh_density = current.mesh_density,
        energy = current.energy,
        "band energy refinement hit the refinement cap"
    );
    Err(TetraError::RefinementNotConverged {
        mesh_density: current.mesh_density,
        last_estimate: current.energy,
    })
}

fn band_energy_at_density<P: EnergyProvider + ?Sized>(
    n: usize,
    provider: &P,
    orientation: &LatticeOrientation,
    num_electrons: f64,
    config: &FermiSolverConfig,
) -> Result<BandEnergySum> {
    let mesh = TetraMesh::new(n)?;
    let eks = BandEnergies::sample(mesh.kpoints(), provider, Some(orientation))?;
    let e_fermi = find_fermi_energy_with(num_electrons, mesh.tetrahedra(), &eks, config)?;
    let weights = integration_weights(e_fermi, mesh.tetrahedra(), &eks)?;
    let energy = sum_energy(&weights, &eks)?;
    Ok(BandEnergySum::new(energy, n, weights))
}

#[cfg(test)]
mod test {
    use nalgebra::Vector3;
    use ndarray::Array2;

    use super::*;
    use crate::{config::RefinementConfig, sample::sample_energies};

    fn linear_band(k: &Vector3<f64>) -> Vec<f64> {
        vec![k.x + k.y + k.z]
    }

    #[test]
    fn test_sum_operator_of_ones_counts_states() {
        let mesh = TetraMesh::new(3).unwrap();
        let eks = sample_energies(mesh.kpoints(), &linear_band, None).unwrap();
        let weights = integration_weights(1.5, mesh.tetrahedra(), &eks).unwrap();
        let ones = OperatorTable::from_array(Array2::ones((eks.num_kpoints(), 1)));
        let total = sum_operator(&weights, &ones).unwrap();
        assert!((total - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sum_energy_full_band() {
        // all states occupied: the linear-plus-correction weights integrate
        // a linear band exactly, <E> = 3/2
        let mesh = TetraMesh::new(2).unwrap();
        let eks = sample_energies(mesh.kpoints(), &linear_band, None).unwrap();
        let weights = integration_weights(4.0, mesh.tetrahedra(), &eks).unwrap();
        let energy = sum_energy(&weights, &eks).unwrap();
        assert!((energy - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let mesh = TetraMesh::new(1).unwrap();
        let eks = sample_energies(mesh.kpoints(), &linear_band, None).unwrap();
        let weights = integration_weights(1.0, mesh.tetrahedra(), &eks).unwrap();
        let wrong = OperatorTable::from_array(Array2::ones((eks.num_kpoints(), 2)));
        assert!(matches!(
            sum_operator(&weights, &wrong),
            Err(TetraError::TableShapeMismatch {
                weights: (1, 8),
                table: (8, 2)
            })
        ));
    }

    #[test]
    fn test_adaptive_without_tolerance() {
        let result = sum_energy_adaptive(
            2,
            &linear_band,
            &Matrix3::identity(),
            1.0,
            None,
            &TetraConfig::default(),
        )
        .unwrap();
        assert_eq!(2, result.mesh_density());
        assert_eq!((1, 27), result.weights().dim());
        assert!((result.energy() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_adaptive_refinement_cap() {
        let config = TetraConfig::new(
            FermiSolverConfig::default(),
            RefinementConfig::new(Some(1e-10), 0),
            Default::default(),
        );
        let result =
            sum_energy_adaptive(1, &linear_band, &Matrix3::identity(), 0.5, None, &config);
        assert!(matches!(
            result,
            Err(TetraError::RefinementNotConverged {
                mesh_density: 1,
                ..
            })
        ));
    }
}
