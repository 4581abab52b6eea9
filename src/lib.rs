//! Density-based atoms-in-molecules partitioning.
//!
//! The molecular electron density, sampled on an integration grid, is divided among the
//! atoms with the stockholder recipe. The pro-atoms are interpolated from a database of
//! spherical reference densities of neutral and charged atoms. Both the Hirshfeld scheme
//! (fixed pro-charges) and the iterative Hirshfeld-I scheme (self-consistent pro-charges)
//! are provided.

pub mod defaults;
pub mod driver;
pub mod error;
pub mod grid;
pub mod io;
pub mod partition;
pub mod proatom;
pub mod radial;
mod utils;

pub use driver::{partition, PartitionResult};
pub use error::PartitionError;
pub use grid::{Grid, MolecularGrid};
pub use io::Configuration;
pub use partition::{
    ConvergencePolicy, Hirshfeld, HirshfeldI, IterationSettings, IterationStatus, MolecularSystem,
    PartitionScheme,
};
pub use proatom::{AtomInterpolator, ProAtomDB, ProAtomKey, ProAtomRecord};
pub use radial::{CubicSpline, RadialTransform};
