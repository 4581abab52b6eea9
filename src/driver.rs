use crate::error::PartitionError;
use crate::grid::Grid;
use crate::io::{write_header, Configuration};
use crate::partition::{Hirshfeld, HirshfeldI, IterationStatus, MolecularSystem, PartitionScheme};
use crate::proatom::ProAtomDB;
use log::info;
use ndarray::prelude::*;

/// Owned results of a partitioning job.
#[derive(Debug, Clone)]
pub struct PartitionResult {
    pub scheme: &'static str,
    pub charges: Array1<f64>,
    pub populations: Array1<f64>,
    pub prodens: Array1<f64>,
    pub weights: Array2<f64>,
    /// number of Hirshfeld runs
    pub iterations: usize,
    pub converged: bool,
}

impl PartitionResult {
    fn from_scheme<S: PartitionScheme>(scheme: &S, iterations: usize, converged: bool) -> Self {
        Self {
            scheme: scheme.name(),
            charges: scheme.charges().to_owned(),
            populations: scheme.populations().to_owned(),
            prodens: scheme.prodens().to_owned(),
            weights: scheme.weights().to_owned(),
            iterations,
            converged,
        }
    }
}

/// Run the partitioning scheme selected in the configuration.
pub fn partition<G: Grid>(
    config: &Configuration,
    system: &MolecularSystem,
    grid: &G,
    proatomdb: &ProAtomDB,
) -> Result<PartitionResult, PartitionError> {
    write_header();
    info!("{: <25} {}", "partitioning scheme:", config.scheme);
    info!("{: <25} {}", "number of atoms:", system.natoms());
    info!("{: <25} {}", "number of grid points:", grid.size());
    info!("{: <25} {}", "pro-atom records:", proatomdb.len());
    match config.scheme.to_lowercase().as_str() {
        "h" | "hirshfeld" => {
            let mut scheme = Hirshfeld::new(system, grid, proatomdb, None)?.with_min_dens(config.min_dens);
            scheme.run()?;
            Ok(PartitionResult::from_scheme(&scheme, 1, true))
        }
        "hi" | "hirshfeld-i" => {
            let mut scheme = HirshfeldI::new(system, grid, proatomdb)?
                .with_settings(config.iteration_settings())
                .with_min_dens(config.min_dens);
            scheme.run()?;
            let converged: bool = matches!(scheme.status(), IterationStatus::Converged { .. });
            Ok(PartitionResult::from_scheme(&scheme, scheme.iterations(), converged))
        }
        other => Err(PartitionError::UnknownScheme(String::from(other))),
    }
}
