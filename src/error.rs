use nalgebra::Vector3;
use ndarray_stats::errors::MinMaxError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TetraError>;

/// Errors surfaced by mesh construction, sampling and the solvers.
#[derive(Debug, Error)]
pub enum TetraError {
    #[error("Mesh density must be > 0, got {0}")]
    InvalidMeshDensity(usize),
    #[error("Energies at k-point #{index} {kpoint:?} are not sorted in ascending order")]
    UnsortedEnergies { index: usize, kpoint: Vector3<f64> },
    #[error("Row {0} of the energy table is not sorted in ascending order")]
    UnsortedTableRow(usize),
    #[error("K-point #{index} returned {found} values, expected {expected}")]
    BandCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Weight table is {weights:?} [band, k-point] but the sampled table is {table:?} [k-point, band]")]
    TableShapeMismatch {
        weights: (usize, usize),
        table: (usize, usize),
    },
    #[error("Tetrahedron #{index} refers to k-point {kpoint}, but the energy table has {num_kpoints} k-points")]
    TetrahedronOutOfRange {
        index: usize,
        kpoint: usize,
        num_kpoints: usize,
    },
    #[error("Energy table has no k-points or no bands")]
    EmptyEnergyTable,
    #[error("Target count {target} is outside [0, {max_states}], Fermi energy cannot be bracketed")]
    UnbracketedRoot { target: f64, max_states: f64 },
    #[error("Bisection did not converge within {max_iter} iterations")]
    BisectionNotConverged { max_iter: u32 },
    #[error("Mesh refinement not converged at mesh density {mesh_density}, last estimate {last_estimate}")]
    RefinementNotConverged {
        mesh_density: usize,
        last_estimate: f64,
    },
    #[error("Cannot bracket energies: {0}")]
    NonFiniteEnergy(#[from] MinMaxError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parsing error: {0}")]
    Config(#[from] toml::de::Error),
}
