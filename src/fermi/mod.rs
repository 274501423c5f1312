/**
Fermi energy from the tetrahedron-integrated number of states:
the root of n(E) - N_electrons, located by bisection.
*/
use nalgebra::Matrix3;
use tracing::{debug, info, trace, warn};

use crate::{
    config::{FermiSolverConfig, TetraConfig},
    dos::integrated_count,
    error::{Result, TetraError},
    mesh::{LatticeOrientation, TetraMesh, Tetrahedron},
    sample::{BandEnergies, EnergyProvider},
};

/**
Fermi energy and the mesh density it was computed on.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FermiEstimate {
    fermi_energy: f64,
    mesh_density: usize,
}

impl FermiEstimate {
    pub fn new(fermi_energy: f64, mesh_density: usize) -> Self {
        Self {
            fermi_energy,
            mesh_density,
        }
    }

    pub fn fermi_energy(&self) -> f64 {
        self.fermi_energy
    }

    pub fn mesh_density(&self) -> usize {
        self.mesh_density
    }
}

/// `find_fermi_energy_with` using the default solver settings.
pub fn find_fermi_energy(
    num_electrons: f64,
    tetras: &[Tetrahedron],
    eks: &BandEnergies,
) -> Result<f64> {
    find_fermi_energy_with(num_electrons, tetras, eks, &FermiSolverConfig::default())
}

/**
Find E_F such that n(E_F) = `num_electrons`.
`eks` must hold every electronic state of the system; each band holds
one state per k-point.
# Arguments:
  * `num_electrons`: target state count, within [0, number of bands].
  * `tetras`: tetrahedra of the submesh.
  * `eks`: band energies on the submesh.
  * `config`: bisection stopping criteria.
# Errors:
  * `UnbracketedRoot` if `num_electrons` lies outside [0, number of bands].
  * `TetrahedronOutOfRange` if `tetras` was built for a different mesh than `eks`.
  * `NonFiniteEnergy` if `eks` contains NaN.
  * `BisectionNotConverged` if `config.max_iter()` is exhausted.
*/
pub fn find_fermi_energy_with(
    num_electrons: f64,
    tetras: &[Tetrahedron],
    eks: &BandEnergies,
    config: &FermiSolverConfig,
) -> Result<f64> {
    let max_states = eks.num_bands() as f64;
    if !(0.0..=max_states).contains(&num_electrons) {
        return Err(TetraError::UnbracketedRoot {
            target: num_electrons,
            max_states,
        });
    }
    eks.check_tetrahedra(tetras)?;
    let (e_min, e_max) = eks.energy_bounds()?;
    let statecount_error = |e: f64| integrated_count(e, tetras, eks) - num_electrons;
    bisect(statecount_error, e_min, e_max, config)
}

/**
Bisection on [lower, upper] for a non-decreasing `f`.
A bracket end is returned directly when `f` already reaches zero there;
this happens for targets at the ends of the valid range.
*/
fn bisect<F>(f: F, lower: f64, upper: f64, config: &FermiSolverConfig) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    if f(lower) >= 0.0 {
        return Ok(lower);
    }
    if f(upper) <= 0.0 {
        return Ok(upper);
    }
    let (mut lo, mut hi) = (lower, upper);
    for iter in 0..config.max_iter() {
        let mid = 0.5 * (lo + hi);
        let residual = f(mid);
        trace!(iter, lo, hi, mid, residual, "fermi bisection step");
        if residual == 0.0 || 0.5 * (hi - lo) < config.xtol() + config.rtol() * mid.abs() {
            debug!(iter, fermi_energy = mid, residual, "fermi energy converged");
            return Ok(mid);
        }
        if residual < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(TetraError::BisectionNotConverged {
        max_iter: config.max_iter(),
    })
}

/**
Find E_F on a mesh of density `n0`, then keep doubling the mesh density until
successive estimates differ by less than `tolerance`.
# Arguments:
  * `n0`: initial mesh density.
  * `provider`: band energies as a function of k in the basis of `recip_basis`.
  * `recip_basis`: reciprocal lattice vectors as rows.
  * `num_electrons`: target state count.
  * `tolerance`: convergence threshold on E_F, falling back to
  `config.refinement().tolerance()`; if both are `None` the estimate at `n0` is returned.
  * `precomputed`: tetrahedra and band energies already built for `n0`
  on the orientation `LatticeOrientation::optimize(recip_basis)`.
  * `config`: bisection settings and the refinement cap.
# Errors:
  * `InvalidMeshDensity` if `n0` is 0.
  * `RefinementNotConverged` after `config.refinement().max_refinements()` doublings.
*/
pub fn find_fermi_adaptive<P: EnergyProvider + ?Sized>(
    n0: usize,
    provider: &P,
    recip_basis: &Matrix3<f64>,
    num_electrons: f64,
    tolerance: Option<f64>,
    precomputed: Option<(&[Tetrahedron], &BandEnergies)>,
    config: &TetraConfig,
) -> Result<FermiEstimate> {
    if n0 == 0 {
        return Err(TetraError::InvalidMeshDensity(n0));
    }
    let orientation = LatticeOrientation::optimize(recip_basis);
    let mut fermi_energy = match precomputed {
        Some((tetras, eks)) => find_fermi_energy_with(num_electrons, tetras, eks, config.fermi())?,
        None => fermi_at_density(n0, provider, &orientation, num_electrons, config.fermi())?,
    };
    info!(mesh_density = n0, fermi_energy, "initial fermi energy");
    let tolerance = match tolerance.or(config.refinement().tolerance()) {
        Some(tol) => tol,
        None => return Ok(FermiEstimate::new(fermi_energy, n0)),
    };
    let mut n = n0;
    for _ in 0..config.refinement().max_refinements() {
        n *= 2;
        let refined = fermi_at_density(n, provider, &orientation, num_electrons, config.fermi())?;
        let change = (refined - fermi_energy).abs();
        info!(mesh_density = n, fermi_energy = refined, change, "refined fermi energy");
        fermi_energy = refined;
        if change < tolerance {
            return Ok(FermiEstimate::new(fermi_energy, n));
        }
    }
    warn!(
        mesh_density = n,
        fermi_energy, "fermi energy refinement hit the refinement cap"
    );
    Err(TetraError::RefinementNotConverged {
        mesh_density: n,
        last_estimate: fermi_energy,
    })
}

/// Build mesh and band energies at density `n` and solve for E_F.
fn fermi_at_density<P: EnergyProvider + ?Sized>(
    n: usize,
    provider: &P,
    orientation: &LatticeOrientation,
    num_electrons: f64,
    config: &FermiSolverConfig,
) -> Result<f64> {
    let mesh = TetraMesh::new(n)?;
    let eks = BandEnergies::sample(mesh.kpoints(), provider, Some(orientation))?;
    find_fermi_energy_with(num_electrons, mesh.tetrahedra(), &eks, config)
}
