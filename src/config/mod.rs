/**
Define Structs for deserialization of the solver configuration (`.toml`).
Every field has a default, so an empty document is a valid config.
*/
use std::fs;

use serde::Deserialize;

use crate::error::Result;

/**
Top-level config.
# Fields:
  * `fermi`: bisection settings.
  * `refinement`: adaptive mesh refinement settings.
  * `dos`: energy grid for DOS spectra.
*/
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TetraConfig {
    fermi: FermiSolverConfig,
    refinement: RefinementConfig,
    dos: DosGridConfig,
}

impl TetraConfig {
    pub fn new(fermi: FermiSolverConfig, refinement: RefinementConfig, dos: DosGridConfig) -> Self {
        Self {
            fermi,
            refinement,
            dos,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn fermi(&self) -> &FermiSolverConfig {
        &self.fermi
    }

    pub fn refinement(&self) -> &RefinementConfig {
        &self.refinement
    }

    pub fn dos(&self) -> &DosGridConfig {
        &self.dos
    }
}

/**
Stopping criteria of the Fermi-energy bisection. Bisection stops once half the
bracket is below `xtol + rtol * |E|`.
*/
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FermiSolverConfig {
    xtol: f64,
    rtol: f64,
    max_iter: u32,
}

impl Default for FermiSolverConfig {
    fn default() -> Self {
        Self {
            xtol: 2e-12,
            rtol: 8.88e-16,
            max_iter: 100,
        }
    }
}

impl FermiSolverConfig {
    pub fn new(xtol: f64, rtol: f64, max_iter: u32) -> Self {
        Self {
            xtol,
            rtol,
            max_iter,
        }
    }

    pub fn xtol(&self) -> f64 {
        self.xtol
    }

    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }
}

/**
Adaptive mesh refinement. Without a `tolerance` the solvers return the
single-pass estimate at the initial mesh density.
*/
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RefinementConfig {
    tolerance: Option<f64>,
    max_refinements: u32,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            tolerance: None,
            max_refinements: 6,
        }
    }
}

impl RefinementConfig {
    pub fn new(tolerance: Option<f64>, max_refinements: u32) -> Self {
        Self {
            tolerance,
            max_refinements,
        }
    }

    pub fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    pub fn max_refinements(&self) -> u32 {
        self.max_refinements
    }
}

/// Energy window and sampling density of a DOS spectrum.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DosGridConfig {
    e_min: f64,
    e_max: f64,
    points_per_unit: u32,
}

impl Default for DosGridConfig {
    fn default() -> Self {
        Self {
            e_min: -10.0,
            e_max: 10.0,
            points_per_unit: 100,
        }
    }
}

impl DosGridConfig {
    pub fn new(e_min: f64, e_max: f64, points_per_unit: u32) -> Self {
        Self {
            e_min,
            e_max,
            points_per_unit,
        }
    }

    pub fn e_min(&self) -> f64 {
        self.e_min
    }

    pub fn e_max(&self) -> f64 {
        self.e_max
    }

    pub fn num_points(&self) -> usize {
        ((self.e_max - self.e_min) * self.points_per_unit as f64) as usize + 1
    }
}
