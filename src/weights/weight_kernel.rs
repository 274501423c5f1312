/**
Per-vertex integration weights of a single tetrahedron (Bloechl, Jepsen and
Andersen, PRB 49, 16223, appendix B) with the curvature correction of
their section V.
*/
use crate::dos::tetra_kernel::{dos_contrib, sort_with_order, EnergyRegion};

/**
Weights of the four vertices of one tetrahedron for one band at `e_fermi`,
returned in the same vertex order as `vertex_energies`.
# Arguments:
  * `e_fermi`: Fermi energy.
  * `vertex_energies`: band energies at the tetrahedron vertices, unsorted.
  * `num_tetra`: total number of tetrahedra in the mesh.
*/
pub fn weight_contribs(e_fermi: f64, vertex_energies: [f64; 4], num_tetra: usize) -> [f64; 4] {
    let (sorted, order) = sort_with_order(vertex_energies);
    let linear = linear_weights(e_fermi, &sorted, num_tetra);
    let correction = curvature_correction(e_fermi, &sorted, num_tetra);
    let mut weights = [0.0; 4];
    order
        .iter()
        .enumerate()
        .for_each(|(i, &vertex)| weights[vertex] = linear[i] + correction[i]);
    weights
}

/**
Linear tetrahedron weights for vertex energies sorted ascending.
Summed over the four vertices they give n_T(E).
*/
pub fn linear_weights(e: f64, sorted: &[f64; 4], num_tetra: usize) -> [f64; 4] {
    // V_T / (4 V_G)
    let c = 0.25 / num_tetra as f64;
    let [e1, e2, e3, e4] = *sorted;
    match EnergyRegion::classify(e, sorted) {
        EnergyRegion::Below => [0.0; 4],
        EnergyRegion::Lower => {
            let (e21, e31, e41) = (e2 - e1, e3 - e1, e4 - e1);
            let x = e - e1;
            let cl = c * x.powi(3) / (e21 * e31 * e41);
            [
                cl * (4.0 - x * (1.0 / e21 + 1.0 / e31 + 1.0 / e41)),
                cl * x / e21,
                cl * x / e31,
                cl * x / e41,
            ]
        }
        EnergyRegion::Middle => {
            let (e31, e41, e32, e42) = (e3 - e1, e4 - e1, e3 - e2, e4 - e2);
            let (d1, d2, d3, d4) = (e - e1, e - e2, e3 - e, e4 - e);
            let c1 = c * d1.powi(2) / (e41 * e31);
            let c2 = c * d1 * d2 * d3 / (e41 * e32 * e31);
            let c3 = c * d2.powi(2) * d4 / (e42 * e32 * e41);
            [
                c1 + (c1 + c2) * d3 / e31 + (c1 + c2 + c3) * d4 / e41,
                c1 + c2 + c3 + (c2 + c3) * d3 / e32 + c3 * d4 / e42,
                (c1 + c2) * d1 / e31 + (c2 + c3) * d2 / e32,
                (c1 + c2 + c3) * d1 / e41 + c3 * d2 / e42,
            ]
        }
        EnergyRegion::Upper => {
            let (e41, e42, e43) = (e4 - e1, e4 - e2, e4 - e3);
            let y = e4 - e;
            let cu = c * y.powi(3) / (e41 * e42 * e43);
            [
                c - cu * y / e41,
                c - cu * y / e42,
                c - cu * y / e43,
                c - cu * (4.0 - y * (1.0 / e41 + 1.0 / e42 + 1.0 / e43)),
            ]
        }
        EnergyRegion::Above => [c; 4],
    }
}

/**
Curvature correction D_T(E)/40 * sum_j (E_j - E_i) for each sorted vertex i.
The four terms always sum to zero.
*/
pub fn curvature_correction(e: f64, sorted: &[f64; 4], num_tetra: usize) -> [f64; 4] {
    let dos = dos_contrib(e, sorted, num_tetra);
    let sum_e: f64 = sorted.iter().sum();
    sorted.map(|ei| dos / 40.0 * (sum_e - 4.0 * ei))
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::dos::tetra_kernel::{num_states_contrib, sort_energies};

    const SAMPLE: [f64; 4] = [-1.0, 0.5, 1.25, 3.0];

    #[test]
    fn test_below_and_above() {
        assert_eq!([0.0; 4], weight_contribs(-2.0, [0.0, 1.0, 2.0, 3.0], 6));
        assert_eq!([0.0; 4], weight_contribs(0.0, [0.0, 1.0, 2.0, 3.0], 6));
        let full = 1.0 / 24.0;
        assert_eq!([full; 4], weight_contribs(3.0, [3.0, 1.0, 2.0, 0.0], 6));
    }

    #[test]
    fn test_linear_weights_sum_to_num_states() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let sorted = sort_energies([(); 4].map(|_| rng.gen_range(-3.0..3.0)));
            for e in [-2.5, -1.0, 0.0, 0.7, 1.9, 2.8] {
                let total: f64 = linear_weights(e, &sorted, 10).iter().sum();
                let expect = num_states_contrib(e, &sorted, 10);
                assert!((total - expect).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn test_lower_region_weights() {
        // E = 0: x = 1, E21 = 1.5, E31 = 2.25, E41 = 4
        let w = linear_weights(0.0, &SAMPLE, 1);
        let cl = 0.25 / (1.5 * 2.25 * 4.0);
        let expect = [
            cl * (4.0 - (1.0 / 1.5 + 1.0 / 2.25 + 1.0 / 4.0)),
            cl / 1.5,
            cl / 2.25,
            cl / 4.0,
        ];
        w.iter()
            .zip(expect.iter())
            .for_each(|(a, b)| assert!((a - b).abs() < 1e-15));
        // lower-energy vertices carry more weight
        assert!(w[0] > w[1] && w[1] > w[2] && w[2] > w[3]);
    }

    fn assert_weights(expect: [f64; 4], w: [f64; 4]) {
        w.iter()
            .zip(expect.iter())
            .for_each(|(a, b)| assert!((a - b).abs() < 1e-14, "{:?} != {:?}", w, expect));
    }

    #[test]
    fn test_middle_region_weights() {
        let w = linear_weights(0.8, &SAMPLE, 1);
        assert_weights(
            [
                4197.0 / 25000.0,
                1887.0 / 15625.0,
                267.0 / 3125.0,
                6039.0 / 125000.0,
            ],
            w,
        );
    }

    #[test]
    fn test_upper_region_weights() {
        let w = linear_weights(2.0, &SAMPLE, 1);
        assert_weights(
            [69.0 / 280.0, 171.0 / 700.0, 237.0 / 980.0, 2061.0 / 9800.0],
            w,
        );
    }

    #[test]
    fn test_middle_and_upper_weights_positive() {
        for e in [0.6, 1.0, 1.3, 2.5] {
            let w = linear_weights(e, &SAMPLE, 1);
            assert!(w.iter().all(|x| *x > 0.0 && *x <= 0.25));
        }
    }

    #[test]
    fn test_correction_sums_to_zero() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let sorted = sort_energies([(); 4].map(|_| rng.gen_range(-3.0..3.0)));
            let e = rng.gen_range(-3.0..3.0);
            let correction: f64 = curvature_correction(e, &sorted, 4).iter().sum();
            assert!(correction.abs() < 1e-12);
        }
    }

    #[test]
    fn test_correction_value() {
        // D_T(0) = 3 / (E21 E31 E41); sum E = 3.75
        let c = curvature_correction(0.0, &SAMPLE, 1);
        let dos = 3.0 / (1.5 * 2.25 * 4.0);
        assert!((c[0] - dos / 40.0 * (3.75 + 4.0)).abs() < 1e-15);
        assert!((c[3] - dos / 40.0 * (3.75 - 12.0)).abs() < 1e-15);
    }

    #[test]
    fn test_unsorted_input_restores_vertex_order() {
        let unsorted = [1.25, 3.0, -1.0, 0.5];
        let w = weight_contribs(0.8, unsorted, 1);
        let sorted_w = {
            let l = linear_weights(0.8, &SAMPLE, 1);
            let c = curvature_correction(0.8, &SAMPLE, 1);
            [l[0] + c[0], l[1] + c[1], l[2] + c[2], l[3] + c[3]]
        };
        // vertex 2 holds E1, vertex 3 E2, vertex 0 E3, vertex 1 E4
        assert_eq!(sorted_w[0], w[2]);
        assert_eq!(sorted_w[1], w[3]);
        assert_eq!(sorted_w[2], w[0]);
        assert_eq!(sorted_w[3], w[1]);
    }

    #[test]
    fn test_degenerate_weights_finite() {
        for sorted in [[0.0, 0.0, 1.0, 2.0], [0.0, 1.0, 1.0, 2.0], [0.0, 1.0, 2.0, 2.0]] {
            for e in [0.0, 0.5, 1.0, 1.5, 2.0] {
                let w = weight_contribs(e, sorted, 1);
                assert!(w.iter().all(|x| x.is_finite()));
                let total: f64 = w.iter().sum();
                assert!((total - num_states_contrib(e, &sorted, 1)).abs() < 1e-14);
            }
        }
    }
}
