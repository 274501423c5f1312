/// Uniform k-point submesh and its tessellation into tetrahedra.
use nalgebra::Vector3;

use crate::error::{Result, TetraError};

/// Four submesh indices spanning one tetrahedron.
pub type Tetrahedron = [usize; 4];

/**
Corners of a subcell, 1-based, grouped into the six tetrahedra of one subcell.
Corner `c` refers to the `c`-th entry of the corner list built in `tetrahedra`;
every group shares the 3-6 diagonal.
*/
const SUBCELL_TETRAS: [[usize; 4]; 6] = [
    [1, 2, 3, 6],
    [1, 3, 5, 6],
    [3, 5, 6, 7],
    [3, 6, 7, 8],
    [3, 4, 6, 8],
    [2, 3, 4, 6],
];

/**
Generate the (n+1)^3 k-points of the submesh covering the full Brillouin zone,
in reduced coordinates with step 1/n and zero shift.
# Arguments:
  * `n`: number of subdivisions along each reciprocal lattice vector.
# Returns:
  * K-points ordered so that `submesh[submesh_index(n, i, j, k)]` is `(i/n, j/n, k/n)`.
*/
pub fn submesh(n: usize) -> Result<Vec<Vector3<f64>>> {
    if n == 0 {
        return Err(TetraError::InvalidMeshDensity(n));
    }
    let step = 1.0 / n as f64;
    let mut points = Vec::with_capacity((n + 1).pow(3));
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                points.push(Vector3::new(
                    i as f64 * step,
                    j as f64 * step,
                    k as f64 * step,
                ));
            }
        }
    }
    Ok(points)
}

/**
Split every one of the n^3 subcells into six tetrahedra of equal volume.
Subcells run over 0..n per axis so that every tetrahedron stays inside the
first image of the Brillouin zone.
*/
pub fn tetrahedra(n: usize) -> Result<Vec<Tetrahedron>> {
    if n == 0 {
        return Err(TetraError::InvalidMeshDensity(n));
    }
    let mut tetras = Vec::with_capacity(6 * n.pow(3));
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                let corners = [
                    (i, j, k),
                    (i + 1, j, k),
                    (i, j + 1, k),
                    (i + 1, j + 1, k),
                    (i, j, k + 1),
                    (i + 1, j, k + 1),
                    (i, j + 1, k + 1),
                    (i + 1, j + 1, k + 1),
                ];
                for pattern in SUBCELL_TETRAS {
                    tetras.push(pattern.map(|c| {
                        let (ci, cj, ck) = corners[c - 1];
                        submesh_index(n, ci, cj, ck)
                    }));
                }
            }
        }
    }
    Ok(tetras)
}

/// Linear submesh index of grid point (i, j, k).
pub fn submesh_index(n: usize, i: usize, j: usize, k: usize) -> usize {
    i + j * (n + 1) + k * (n + 1).pow(2)
}

/// Inverse of `submesh_index`.
pub fn submesh_ijk(n: usize, index: usize) -> (usize, usize, usize) {
    let i = index % (n + 1);
    let j = (index / (n + 1)) % (n + 1);
    let k = index / (n + 1).pow(2);
    (i, j, k)
}

/**
Submesh and tetrahedra built together for one mesh density.
*/
#[derive(Debug, Clone)]
pub struct TetraMesh {
    n: usize,
    kpoints: Vec<Vector3<f64>>,
    tetrahedra: Vec<Tetrahedron>,
}

impl TetraMesh {
    pub fn new(n: usize) -> Result<Self> {
        Ok(Self {
            n,
            kpoints: submesh(n)?,
            tetrahedra: tetrahedra(n)?,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn kpoints(&self) -> &[Vector3<f64>] {
        self.kpoints.as_ref()
    }

    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        self.tetrahedra.as_ref()
    }

    pub fn num_tetra(&self) -> usize {
        self.tetrahedra.len()
    }
}
