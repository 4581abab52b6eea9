use crate::error::PartitionError;
use ndarray::prelude::*;

/// Numerical integration grid on which the molecular density is sampled.
///
/// The partitioning only needs the Cartesian points and a quadrature rule, so any
/// molecular grid (Becke, cubic, ...) can be plugged in by implementing this trait.
pub trait Grid: Sync {
    /// Number of grid points.
    fn size(&self) -> usize;
    /// Cartesian coordinates of the grid points, shape (size, 3).
    fn points(&self) -> ArrayView2<f64>;
    /// Integral of a function sampled on the grid points.
    fn integrate(&self, values: ArrayView1<f64>) -> f64;
}

/// Grid given by a set of points and their quadrature weights.
#[derive(Debug, Clone)]
pub struct MolecularGrid {
    points: Array2<f64>,
    weights: Array1<f64>,
}

impl MolecularGrid {
    pub fn new(points: Array2<f64>, weights: Array1<f64>) -> Result<Self, PartitionError> {
        if points.ncols() != 3 {
            return Err(PartitionError::InvalidGrid(format!(
                "grid points need three Cartesian components, got {}",
                points.ncols()
            )));
        }
        if points.nrows() != weights.len() {
            return Err(PartitionError::ShapeMismatch {
                what: "grid points & weights",
                expected: points.nrows(),
                found: weights.len(),
            });
        }
        Ok(Self { points, weights })
    }

    /// Uniform rectangular grid with `shape[k]` points along axis k, starting at `origin`.
    /// Every point carries the weight `spacing^3`.
    pub fn cubic(origin: [f64; 3], spacing: f64, shape: [usize; 3]) -> Result<Self, PartitionError> {
        if !(spacing > 0.0) {
            return Err(PartitionError::InvalidGrid(format!(
                "the grid spacing has to be positive, got {}",
                spacing
            )));
        }
        let size: usize = shape.iter().product();
        let mut points: Array2<f64> = Array2::zeros([size, 3]);
        let mut row: usize = 0;
        for i in 0..shape[0] {
            for j in 0..shape[1] {
                for k in 0..shape[2] {
                    points[[row, 0]] = origin[0] + i as f64 * spacing;
                    points[[row, 1]] = origin[1] + j as f64 * spacing;
                    points[[row, 2]] = origin[2] + k as f64 * spacing;
                    row += 1;
                }
            }
        }
        let weights: Array1<f64> = Array1::from_elem(size, spacing.powi(3));
        Self::new(points, weights)
    }

    pub fn weights(&self) -> ArrayView1<f64> {
        self.weights.view()
    }
}

impl Grid for MolecularGrid {
    fn size(&self) -> usize {
        self.weights.len()
    }

    fn points(&self) -> ArrayView2<f64> {
        self.points.view()
    }

    fn integrate(&self, values: ArrayView1<f64>) -> f64 {
        self.weights.dot(&values)
    }
}
