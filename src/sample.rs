/**
Sampling of caller-supplied band energies and operator matrix elements
on the submesh.
*/
use nalgebra::Vector3;
use ndarray::{Array2, ArrayView1, ArrayView2};
use ndarray_stats::QuantileExt;
use tracing::debug;

use crate::{
    error::{Result, TetraError},
    mesh::{LatticeOrientation, Tetrahedron},
};

/// Band energies E_n(k) at a k-point given in the caller's reciprocal basis,
/// in ascending order.
pub trait EnergyProvider {
    fn energies_at(&self, k: &Vector3<f64>) -> Vec<f64>;
}

impl<F> EnergyProvider for F
where
    F: Fn(&Vector3<f64>) -> Vec<f64>,
{
    fn energies_at(&self, k: &Vector3<f64>) -> Vec<f64> {
        self(k)
    }
}

/// Matrix elements X_n(k) of an operator, ordered like the band energies.
pub trait OperatorProvider {
    fn values_at(&self, k: &Vector3<f64>) -> Vec<f64>;
}

impl<F> OperatorProvider for F
where
    F: Fn(&Vector3<f64>) -> Vec<f64>,
{
    fn values_at(&self, k: &Vector3<f64>) -> Vec<f64> {
        self(k)
    }
}

/**
Table of band energies indexed `[k-point, band]`, each row ascending.
*/
#[derive(Debug, Clone)]
pub struct BandEnergies {
    energies: Array2<f64>,
}

impl BandEnergies {
    /**
    Evaluate `provider` at every submesh k-point.
    # Arguments:
      * `kpoints`: the submesh, in the optimized basis when `orientation` is given.
      * `provider`: the band-energy function.
      * `orientation`: when present, each k-point is mapped back to the caller's
      original basis before `provider` is called.
    # Errors:
      * `UnsortedEnergies` naming the first k-point whose energies are not ascending.
    */
    pub fn sample<P: EnergyProvider + ?Sized>(
        kpoints: &[Vector3<f64>],
        provider: &P,
        orientation: Option<&LatticeOrientation>,
    ) -> Result<Self> {
        let energies = collect_samples(kpoints, orientation, |k| {
            let values = provider.energies_at(k);
            if values.windows(2).all(|w| w[0] <= w[1]) {
                Ok(values)
            } else {
                Err(*k)
            }
        })?;
        debug!(
            kpoints = energies.nrows(),
            bands = energies.ncols(),
            "sampled band energies"
        );
        Ok(Self { energies })
    }

    /// Wrap a precomputed `[k-point, band]` table, checking row order.
    pub fn from_array(energies: Array2<f64>) -> Result<Self> {
        if energies.is_empty() {
            return Err(TetraError::EmptyEnergyTable);
        }
        if let Some(index) = energies
            .rows()
            .into_iter()
            .position(|row| row.iter().zip(row.iter().skip(1)).any(|(a, b)| !(a <= b)))
        {
            return Err(TetraError::UnsortedTableRow(index));
        }
        Ok(Self { energies })
    }

    pub fn num_kpoints(&self) -> usize {
        self.energies.nrows()
    }

    pub fn num_bands(&self) -> usize {
        self.energies.ncols()
    }

    pub fn energies(&self) -> ArrayView2<'_, f64> {
        self.energies.view()
    }

    pub fn at_kpoint(&self, index: usize) -> ArrayView1<'_, f64> {
        self.energies.row(index)
    }

    /// Energies of `band` at the four vertices, in vertex order.
    pub fn vertex_energies(&self, tetra: &Tetrahedron, band: usize) -> [f64; 4] {
        tetra.map(|k| self.energies[[k, band]])
    }

    /**
    Check that every vertex of `tetras` indexes a k-point of this table.
    # Errors:
      * `TetrahedronOutOfRange` for the first tetrahedron that does not, e.g. one
      built for a denser mesh.
    */
    pub fn check_tetrahedra(&self, tetras: &[Tetrahedron]) -> Result<()> {
        let num_kpoints = self.num_kpoints();
        tetras
            .iter()
            .enumerate()
            .find_map(|(index, t)| {
                t.iter()
                    .find(|&&k| k >= num_kpoints)
                    .map(|&kpoint| TetraError::TetrahedronOutOfRange {
                        index,
                        kpoint,
                        num_kpoints,
                    })
            })
            .map_or(Ok(()), Err)
    }

    /// Lowest and highest energy over all k-points and bands.
    pub fn energy_bounds(&self) -> Result<(f64, f64)> {
        Ok((*self.energies.min()?, *self.energies.max()?))
    }
}

/**
Table of operator matrix elements indexed `[k-point, band]`, in the band
order of a companion `BandEnergies`.
*/
#[derive(Debug, Clone)]
pub struct OperatorTable {
    values: Array2<f64>,
}

impl OperatorTable {
    /// Evaluate `provider` at every submesh k-point; no ordering is enforced.
    pub fn sample<P: OperatorProvider + ?Sized>(
        kpoints: &[Vector3<f64>],
        provider: &P,
        orientation: Option<&LatticeOrientation>,
    ) -> Result<Self> {
        let values = collect_samples(kpoints, orientation, |k| Ok(provider.values_at(k)))?;
        debug!(
            kpoints = values.nrows(),
            bands = values.ncols(),
            "sampled operator values"
        );
        Ok(Self { values })
    }

    pub fn from_array(values: Array2<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn num_bands(&self) -> usize {
        self.values.ncols()
    }
}

/// Shorthand for `BandEnergies::sample`.
pub fn sample_energies<P: EnergyProvider + ?Sized>(
    kpoints: &[Vector3<f64>],
    provider: &P,
    orientation: Option<&LatticeOrientation>,
) -> Result<BandEnergies> {
    BandEnergies::sample(kpoints, provider, orientation)
}

/// Shorthand for `OperatorTable::sample`.
pub fn sample_operator<P: OperatorProvider + ?Sized>(
    kpoints: &[Vector3<f64>],
    provider: &P,
    orientation: Option<&LatticeOrientation>,
) -> Result<OperatorTable> {
    OperatorTable::sample(kpoints, provider, orientation)
}

/**
Call `eval` at each k-point (mapped to the original basis if needed) and
stack the returned rows. `eval` reports an unsorted row by returning the
offending k-point as `Err`.
*/
fn collect_samples<F>(
    kpoints: &[Vector3<f64>],
    orientation: Option<&LatticeOrientation>,
    eval: F,
) -> Result<Array2<f64>>
where
    F: Fn(&Vector3<f64>) -> std::result::Result<Vec<f64>, Vector3<f64>>,
{
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(kpoints.len());
    for (index, k_opt) in kpoints.iter().enumerate() {
        let k = match orientation {
            Some(o) => o.to_original_basis(k_opt),
            None => *k_opt,
        };
        let values = eval(&k).map_err(|kpoint| TetraError::UnsortedEnergies { index, kpoint })?;
        if let Some(first) = rows.first() {
            if first.len() != values.len() {
                return Err(TetraError::BandCountMismatch {
                    index,
                    expected: first.len(),
                    found: values.len(),
                });
            }
        }
        rows.push(values);
    }
    let num_bands = rows.first().map_or(0, |r| r.len());
    if rows.is_empty() || num_bands == 0 {
        return Err(TetraError::EmptyEnergyTable);
    }
    let mut table = Array2::zeros((rows.len(), num_bands));
    table
        .rows_mut()
        .into_iter()
        .zip(rows.iter())
        .for_each(|(mut dst, src)| dst.assign(&ArrayView1::from(src.as_slice())));
    Ok(table)
}
