use crate::error::PartitionError;
use ndarray::prelude::*;

/// Molecule whose density is partitioned: nuclear positions, atomic numbers,
/// pseudo numbers (effective core charges) and the molecular density on the grid points.
///
/// All arrays are owned copies, the caller data is never modified.
#[derive(Debug, Clone)]
pub struct MolecularSystem {
    coordinates: Array2<f64>,
    numbers: Vec<u8>,
    pseudo_numbers: Array1<f64>,
    density: Array1<f64>,
}

impl MolecularSystem {
    pub fn new(
        coordinates: Array2<f64>,
        numbers: Vec<u8>,
        pseudo_numbers: Array1<f64>,
        density: Array1<f64>,
    ) -> Result<Self, PartitionError> {
        if numbers.is_empty() {
            return Err(PartitionError::ShapeMismatch {
                what: "numbers (at least one atom)",
                expected: 1,
                found: 0,
            });
        }
        if coordinates.ncols() != 3 {
            return Err(PartitionError::ShapeMismatch {
                what: "coordinates (Cartesian components)",
                expected: 3,
                found: coordinates.ncols(),
            });
        }
        if coordinates.nrows() != numbers.len() {
            return Err(PartitionError::ShapeMismatch {
                what: "numbers & coordinates",
                expected: numbers.len(),
                found: coordinates.nrows(),
            });
        }
        if pseudo_numbers.len() != numbers.len() {
            return Err(PartitionError::ShapeMismatch {
                what: "numbers & pseudo_numbers",
                expected: numbers.len(),
                found: pseudo_numbers.len(),
            });
        }
        let n_bad: usize = density.iter().filter(|x| !x.is_finite()).count();
        if n_bad > 0 {
            return Err(PartitionError::NonFiniteDensity { count: n_bad });
        }
        Ok(Self {
            coordinates,
            numbers,
            pseudo_numbers,
            density,
        })
    }

    /// System without pseudopotentials, the pseudo numbers equal the atomic numbers.
    pub fn all_electron(
        coordinates: Array2<f64>,
        numbers: Vec<u8>,
        density: Array1<f64>,
    ) -> Result<Self, PartitionError> {
        let pseudo_numbers: Array1<f64> = numbers.iter().map(|z| *z as f64).collect();
        Self::new(coordinates, numbers, pseudo_numbers, density)
    }

    pub fn natoms(&self) -> usize {
        self.numbers.len()
    }

    pub fn coordinates(&self) -> ArrayView2<f64> {
        self.coordinates.view()
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn pseudo_numbers(&self) -> ArrayView1<f64> {
        self.pseudo_numbers.view()
    }

    /// Molecular density evaluated on the grid points.
    pub fn density(&self) -> ArrayView1<f64> {
        self.density.view()
    }
}
