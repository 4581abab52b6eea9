mod hirshfeld;
mod hirshfeld_i;
mod logging;
mod stockholder;
mod system;

pub use hirshfeld::{BasisExpansion, Hirshfeld, HirshfeldModel};
pub use hirshfeld_i::{ConvergencePolicy, HirshfeldI, IterationSettings, IterationState, IterationStatus};
pub use stockholder::{PartitionState, ProAtomModel, Stockholder};
pub use system::MolecularSystem;

use crate::error::PartitionError;
use ndarray::{ArrayView1, ArrayView2};

/// Common interface of the stockholder partitioning schemes.
pub trait PartitionScheme {
    /// Short name of the scheme, "h" for Hirshfeld and "hi" for Hirshfeld-I.
    fn name(&self) -> &'static str;
    /// Run the atoms-in-molecule partitioning.
    fn run(&mut self) -> Result<(), PartitionError>;
    /// Charges of the atoms in the molecule.
    fn charges(&self) -> ArrayView1<f64>;
    /// Electron populations of the atoms in the molecule.
    fn populations(&self) -> ArrayView1<f64>;
    /// Atomic weight functions on the grid points, shape (natoms, npoints).
    fn weights(&self) -> ArrayView2<f64>;
    /// Pro-molecule density on the grid points.
    fn prodens(&self) -> ArrayView1<f64>;
}
