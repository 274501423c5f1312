/// Brillouin zone discretization: submesh, tetrahedra and lattice orientation.
pub mod orientation;
pub mod submesh;

pub use orientation::LatticeOrientation;
pub use submesh::{submesh, submesh_ijk, submesh_index, tetrahedra, TetraMesh, Tetrahedron};
