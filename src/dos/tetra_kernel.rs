/**
Closed-form contributions of a single tetrahedron to the integrated
number of states n_T(E) and the density of states D_T(E), for linearly
interpolated energies (Bloechl, Jepsen and Andersen, PRB 49, 16223,
appendices A and C).
*/
use std::cmp::Ordering;

/**
Position of an energy relative to the sorted vertex energies E1 <= E2 <= E3 <= E4.

Boundaries are half-open so that every interior region has strictly
positive energy differences in its denominators:
  * `Below`:  E <= E1
  * `Lower`:  E1 < E < E2
  * `Middle`: E2 <= E < E3 (and E > E1)
  * `Upper`:  E3 <= E < E4 (and E > E1)
  * `Above`:  E >= E4 (and E > E1)

When adjacent vertex energies coincide the empty region is skipped, and
an energy sitting on the shared boundary is evaluated by the next region's
formula, which gives the limiting value of the closed form.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyRegion {
    Below,
    Lower,
    Middle,
    Upper,
    Above,
}

impl EnergyRegion {
    pub fn classify(e: f64, sorted: &[f64; 4]) -> Self {
        let [e1, e2, e3, e4] = *sorted;
        if e <= e1 {
            EnergyRegion::Below
        } else if e >= e4 {
            EnergyRegion::Above
        } else if e < e2 {
            EnergyRegion::Lower
        } else if e < e3 {
            EnergyRegion::Middle
        } else {
            EnergyRegion::Upper
        }
    }
}

/// Vertex energies in ascending order; ties are kept.
pub fn sort_energies(vertex_energies: [f64; 4]) -> [f64; 4] {
    let mut sorted = vertex_energies;
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/**
Sort vertex energies ascending and keep the permutation:
`sorted[i] == vertex_energies[order[i]]`.
*/
pub fn sort_with_order(vertex_energies: [f64; 4]) -> ([f64; 4], [usize; 4]) {
    let mut order = [0, 1, 2, 3];
    order.sort_by(|&a, &b| {
        vertex_energies[a]
            .partial_cmp(&vertex_energies[b])
            .unwrap_or(Ordering::Equal)
    });
    (order.map(|i| vertex_energies[i]), order)
}

/**
Contribution n_T(E) of one tetrahedron to the integrated number of states.
# Arguments:
  * `e`: energy.
  * `sorted`: vertex energies in ascending order.
  * `num_tetra`: total number of tetrahedra; a fully occupied tetrahedron gives 1/num_tetra.
*/
pub fn num_states_contrib(e: f64, sorted: &[f64; 4], num_tetra: usize) -> f64 {
    let vt = 1.0 / num_tetra as f64;
    let [e1, e2, e3, e4] = *sorted;
    match EnergyRegion::classify(e, sorted) {
        EnergyRegion::Below => 0.0,
        EnergyRegion::Lower => {
            let (e21, e31, e41) = (e2 - e1, e3 - e1, e4 - e1);
            vt * (e - e1).powi(3) / (e21 * e31 * e41)
        }
        EnergyRegion::Middle => {
            let (e21, e31, e41, e32, e42) = (e2 - e1, e3 - e1, e4 - e1, e3 - e2, e4 - e2);
            let x = e - e2;
            vt / (e31 * e41)
                * (e21.powi(2) + 3.0 * e21 * x + 3.0 * x.powi(2)
                    - (e31 + e42) / (e32 * e42) * x.powi(3))
        }
        EnergyRegion::Upper => {
            let (e41, e42, e43) = (e4 - e1, e4 - e2, e4 - e3);
            vt * (1.0 - (e4 - e).powi(3) / (e41 * e42 * e43))
        }
        EnergyRegion::Above => vt,
    }
}

/**
Contribution D_T(E) = dn_T/dE of one tetrahedron to the density of states.
Arguments as in `num_states_contrib`.
*/
pub fn dos_contrib(e: f64, sorted: &[f64; 4], num_tetra: usize) -> f64 {
    let vt = 1.0 / num_tetra as f64;
    let [e1, e2, e3, e4] = *sorted;
    match EnergyRegion::classify(e, sorted) {
        EnergyRegion::Below | EnergyRegion::Above => 0.0,
        EnergyRegion::Lower => {
            let (e21, e31, e41) = (e2 - e1, e3 - e1, e4 - e1);
            vt * 3.0 * (e - e1).powi(2) / (e21 * e31 * e41)
        }
        EnergyRegion::Middle => {
            let (e21, e31, e41, e32, e42) = (e2 - e1, e3 - e1, e4 - e1, e3 - e2, e4 - e2);
            let x = e - e2;
            vt / (e31 * e41) * (3.0 * e21 + 6.0 * x - 3.0 * (e31 + e42) / (e32 * e42) * x.powi(2))
        }
        EnergyRegion::Upper => {
            let (e41, e42, e43) = (e4 - e1, e4 - e2, e4 - e3);
            vt * 3.0 * (e4 - e).powi(2) / (e41 * e42 * e43)
        }
    }
}
