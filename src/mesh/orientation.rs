/// Choice of reciprocal lattice vector order and sign for the tessellation.
use nalgebra::{Matrix3, Vector3};

const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

const SIGNS: [[i32; 3]; 8] = [
    [1, 1, 1],
    [1, 1, -1],
    [1, -1, 1],
    [1, -1, -1],
    [-1, 1, 1],
    [-1, 1, -1],
    [-1, -1, 1],
    [-1, -1, -1],
];

/**
Permutation and sign flips relating the caller's reciprocal basis `R`
(rows are basis vectors) to the optimized basis `R_opt`:
`R_opt[order[i], :] = signs[i] * R[i, :]`.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeOrientation {
    order: [usize; 3],
    signs: [i32; 3],
}

impl Default for LatticeOrientation {
    fn default() -> Self {
        Self {
            order: [0, 1, 2],
            signs: [1, 1, 1],
        }
    }
}

impl LatticeOrientation {
    pub fn new(order: [usize; 3], signs: [i32; 3]) -> Self {
        Self { order, signs }
    }

    /**
    Search all 48 orderings and sign flips of the reciprocal lattice vectors
    for the one that minimizes the Cartesian length of the subcell diagonal
    running from corner 3 to corner 6, i.e. `|-r0 + r1 - r2|` in the
    transformed basis. The shortest diagonal gives the smallest
    interpolation error in the tetrahedra.
    # Arguments:
      * `recip_basis`: reciprocal lattice vectors as rows.
    # Returns:
      * The first minimal orientation in enumeration order.
    */
    pub fn optimize(recip_basis: &Matrix3<f64>) -> Self {
        let mut best = Self::default();
        let mut best_diagonal = f64::INFINITY;
        for order in PERMUTATIONS {
            for signs in SIGNS {
                let candidate = Self::new(order, signs);
                let r = candidate.optimized_basis(recip_basis);
                let diagonal = (-r.row(0) + r.row(1) - r.row(2)).norm();
                if diagonal < best_diagonal {
                    best_diagonal = diagonal;
                    best = candidate;
                }
            }
        }
        best
    }

    /// Reciprocal basis in the optimized orientation, rows as basis vectors.
    pub fn optimized_basis(&self, recip_basis: &Matrix3<f64>) -> Matrix3<f64> {
        let mut r_opt = Matrix3::zeros();
        for i in 0..3 {
            r_opt.set_row(
                self.order[i],
                &(recip_basis.row(i) * self.signs[i] as f64),
            );
        }
        r_opt
    }

    /// Convert a k-point given in the optimized basis back to the original basis.
    pub fn to_original_basis(&self, k_opt: &Vector3<f64>) -> Vector3<f64> {
        Vector3::from_fn(|i, _| k_opt[self.order[i]] * self.signs[i] as f64)
    }

    pub fn order(&self) -> [usize; 3] {
        self.order
    }

    pub fn signs(&self) -> [i32; 3] {
        self.signs
    }
}
