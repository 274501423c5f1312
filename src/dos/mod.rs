pub mod dos_compute;
pub mod tetra_kernel;

pub use dos_compute::{
    compute_energy_range, density_of_states, dos_bands, dos_spectrum, dos_spectrum_on_grid,
    integrated_count, num_states_bands,
};
pub use tetra_kernel::EnergyRegion;

/// Density of states D(E) and integrated count n(E) tabulated on an energy grid.
#[derive(Debug, Clone)]
pub struct DOS {
    num_points: usize,
    energy_range: Vec<f64>,
    dos: Vec<f64>,
    integrated: Vec<f64>,
}

impl DOS {
    pub fn new(
        num_points: usize,
        energy_range: Vec<f64>,
        dos: Vec<f64>,
        integrated: Vec<f64>,
    ) -> Self {
        Self {
            num_points,
            energy_range,
            dos,
            integrated,
        }
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn energy_range(&self) -> &[f64] {
        self.energy_range.as_ref()
    }

    pub fn dos(&self) -> &[f64] {
        self.dos.as_ref()
    }

    pub fn integrated(&self) -> &[f64] {
        self.integrated.as_ref()
    }
}
