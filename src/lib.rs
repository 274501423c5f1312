/*!
Brillouin-zone integration with the linear tetrahedron method.

The zone is cut into a uniform submesh of `n^3` parallelepipeds, each split
into six tetrahedra along the shortest main diagonal chosen by
[`LatticeOrientation::optimize`]. Band energies supplied by the caller are
interpolated linearly inside each tetrahedron, which gives closed forms for
the density of states, the integrated number of states, the Fermi energy and
the integration weights of BZ sums.
*/
extern crate nalgebra as na;

pub mod config;
pub mod dos;
pub mod error;
pub mod fermi;
pub mod mesh;
pub mod sample;
pub mod util;
pub mod weights;

pub use config::TetraConfig;
pub use dos::{density_of_states, dos_spectrum, integrated_count, DOS};
pub use error::{Result, TetraError};
pub use fermi::{find_fermi_adaptive, find_fermi_energy, find_fermi_energy_with, FermiEstimate};
pub use mesh::{submesh, tetrahedra, LatticeOrientation, TetraMesh, Tetrahedron};
pub use sample::{
    sample_energies, sample_operator, BandEnergies, EnergyProvider, OperatorProvider,
    OperatorTable,
};
pub use weights::{
    integration_weights, sum_energy, sum_energy_adaptive, sum_operator, BandEnergySum,
};

/**
Orientation of the reciprocal basis whose subcell diagonal
`-r0 + r1 - r2` is shortest.
# Arguments:
  * `recip_basis`: reciprocal lattice vectors as rows.
*/
pub fn optimize_orientation(recip_basis: &na::Matrix3<f64>) -> LatticeOrientation {
    LatticeOrientation::optimize(recip_basis)
}
