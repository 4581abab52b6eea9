use crate::defaults::{HI_CHARGE_CONV, HI_MAX_ITER};
use crate::error::PartitionError;
use crate::grid::Grid;
use crate::partition::logging::*;
use crate::partition::{Hirshfeld, MolecularSystem, PartitionScheme};
use crate::proatom::ProAtomDB;
use crate::utils::Timer;
use log::{log_enabled, warn, Level};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// What to do if the iterations do not reach the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvergencePolicy {
    /// `run` returns `PartitionError::NotConverged`
    Fail,
    /// `run` logs a warning and succeeds, the status is `NotConverged`
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationSettings {
    pub max_iterations: usize,
    /// convergence threshold for the max. absolute change of the charges
    pub tolerance: f64,
    pub policy: ConvergencePolicy,
}

impl Default for IterationSettings {
    fn default() -> Self {
        Self {
            max_iterations: HI_MAX_ITER,
            tolerance: HI_CHARGE_CONV,
            policy: ConvergencePolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationStatus {
    Initializing,
    Iterating,
    Converged { iterations: usize },
    NotConverged { iterations: usize, delta: f64 },
}

impl IterationStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, IterationStatus::Converged { .. })
    }
}

/// Pro-charges of the current iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationState {
    pub procharges: Array1<f64>,
    pub iteration: usize,
}

/// Iterative Hirshfeld (Hirshfeld-I) partitioning.
///
/// The pro-charges of a Hirshfeld partitioning are replaced by the resulting charges
/// until both agree within the tolerance. The final weights, charges, populations and
/// pro-molecule density are those of the last Hirshfeld run.
pub struct HirshfeldI<'a, G: Grid> {
    hirshfeld: Hirshfeld<'a, G>,
    settings: IterationSettings,
    seed: Array1<f64>,
    state: IterationState,
    status: IterationStatus,
}

impl<'a, G: Grid> HirshfeldI<'a, G> {
    /// Hirshfeld-I partitioning starting from neutral pro-atoms.
    pub fn new(
        system: &'a MolecularSystem,
        grid: &'a G,
        proatomdb: &'a ProAtomDB,
    ) -> Result<Self, PartitionError> {
        let hirshfeld: Hirshfeld<G> = Hirshfeld::new(system, grid, proatomdb, None)?;
        let seed: Array1<f64> = Array1::zeros(system.natoms());
        Ok(Self {
            hirshfeld,
            settings: IterationSettings::default(),
            state: IterationState {
                procharges: seed.clone(),
                iteration: 0,
            },
            seed,
            status: IterationStatus::Initializing,
        })
    }

    pub fn with_settings(mut self, settings: IterationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Initial pro-charges of the iterations.
    pub fn with_seed(mut self, procharges: Array1<f64>) -> Result<Self, PartitionError> {
        self.hirshfeld.set_procharges(procharges.clone())?;
        self.state.procharges = procharges.clone();
        self.seed = procharges;
        Ok(self)
    }

    pub fn with_min_dens(mut self, min_dens: f64) -> Self {
        self.hirshfeld = self.hirshfeld.with_min_dens(min_dens);
        self
    }

    pub fn settings(&self) -> &IterationSettings {
        &self.settings
    }

    pub fn status(&self) -> IterationStatus {
        self.status
    }

    /// Number of completed Hirshfeld runs of the last call to `run`.
    pub fn iterations(&self) -> usize {
        self.state.iteration
    }

    /// Pro-charges used in the last Hirshfeld run.
    pub fn procharges(&self) -> ArrayView1<f64> {
        self.hirshfeld.procharges()
    }

    pub fn min_dens(&self) -> f64 {
        self.hirshfeld.min_dens()
    }
}

/// Largest absolute change between two sets of charges. NaN charges give NaN, which
/// never passes the convergence test.
fn max_charge_change(charges: ArrayView1<f64>, procharges: ArrayView1<f64>) -> f64 {
    charges
        .iter()
        .zip(procharges.iter())
        .map(|(q, q0)| (q - q0).abs())
        .fold(0.0, |m: f64, d| if d.is_nan() || m.is_nan() { f64::NAN } else { m.max(d) })
}

impl<'a, G: Grid> PartitionScheme for HirshfeldI<'a, G> {
    fn name(&self) -> &'static str {
        "hi"
    }

    fn run(&mut self) -> Result<(), PartitionError> {
        let timer: Timer = Timer::start();
        let max_iter: usize = self.settings.max_iterations;
        let tolerance: f64 = self.settings.tolerance;
        self.state = IterationState {
            procharges: self.seed.clone(),
            iteration: 0,
        };
        self.status = IterationStatus::Iterating;
        if log_enabled!(Level::Info) {
            print_hi_init(max_iter, tolerance);
        }
        let mut delta: f64 = f64::INFINITY;

        'hi_loop: for i in 0..max_iter {
            self.hirshfeld.set_procharges(self.state.procharges.clone())?;
            self.hirshfeld.run()?;
            self.state.iteration = i + 1;
            let charges: ArrayView1<f64> = self.hirshfeld.charges();
            delta = max_charge_change(charges, self.state.procharges.view());
            if log_enabled!(Level::Info) {
                print_hi_iteration(i, delta, charges);
            }
            if delta < tolerance {
                self.status = IterationStatus::Converged { iterations: i + 1 };
                break 'hi_loop;
            }
            // NaN charges cannot be used as pro-charges of the next iteration
            if delta.is_nan() {
                break 'hi_loop;
            }
            self.state.procharges = charges.to_owned();
        }
        if !self.status.is_converged() {
            self.status = IterationStatus::NotConverged {
                iterations: self.state.iteration,
                delta,
            };
        }
        if log_enabled!(Level::Info) {
            print_hi_end(timer, &self.status, self.hirshfeld.charges());
        }
        match self.status {
            IterationStatus::NotConverged { iterations, delta } => match self.settings.policy {
                ConvergencePolicy::Fail => Err(PartitionError::NotConverged { iterations, delta }),
                ConvergencePolicy::Warn => {
                    warn!(
                        "Hirshfeld-I did not converge after {} iterations (max. charge change {:.2e}), \
                         the charges of the last iteration are used",
                        iterations, delta
                    );
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }

    fn charges(&self) -> ArrayView1<f64> {
        self.hirshfeld.charges()
    }

    fn populations(&self) -> ArrayView1<f64> {
        self.hirshfeld.populations()
    }

    fn weights(&self) -> ArrayView2<f64> {
        self.hirshfeld.weights()
    }

    fn prodens(&self) -> ArrayView1<f64> {
        self.hirshfeld.prodens()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MolecularGrid;
    use crate::proatom::test_utils::gaussian_record;

    /// Cubic grid whose quadrature breaks down and returns NaN for every integral.
    struct BrokenGrid {
        grid: MolecularGrid,
    }

    impl Grid for BrokenGrid {
        fn size(&self) -> usize {
            self.grid.size()
        }

        fn points(&self) -> ArrayView2<f64> {
            self.grid.points()
        }

        fn integrate(&self, _values: ArrayView1<f64>) -> f64 {
            f64::NAN
        }
    }

    fn get_db() -> ProAtomDB {
        ProAtomDB::new(vec![gaussian_record(1, -1), gaussian_record(1, 0)])
    }

    fn get_grid() -> MolecularGrid {
        MolecularGrid::cubic([-2.0, -2.0, -2.0], 0.5, [9, 9, 9]).unwrap()
    }

    fn get_system(grid: &MolecularGrid) -> MolecularSystem {
        MolecularSystem::all_electron(
            array![[0.0, 0.0, -0.7], [0.0, 0.0, 0.7]],
            vec![1, 1],
            Array1::from_elem(grid.size(), 0.01),
        )
        .unwrap()
    }

    #[test]
    fn nan_charges_propagate_into_the_charge_change() {
        let q0: Array1<f64> = array![0.1, -0.1, 0.0];
        assert!((max_charge_change(array![0.3, -0.2, 0.05].view(), q0.view()) - 0.2).abs() < 1e-12);
        assert!(max_charge_change(array![f64::NAN, -0.1, 0.0].view(), q0.view()).is_nan());
        assert!(max_charge_change(array![0.1, -0.1, f64::NAN].view(), q0.view()).is_nan());
        assert_eq!(max_charge_change(q0.view(), q0.view()), 0.0);
    }

    #[test]
    fn nan_charges_are_never_converged() {
        let grid: BrokenGrid = BrokenGrid { grid: get_grid() };
        let system: MolecularSystem = get_system(&grid.grid);
        let db: ProAtomDB = get_db();
        let mut hirshfeld_i = HirshfeldI::new(&system, &grid, &db).unwrap();
        match hirshfeld_i.run() {
            Err(PartitionError::NotConverged { iterations, delta }) => {
                assert_eq!(iterations, 1);
                assert!(delta.is_nan());
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!hirshfeld_i.status().is_converged());
    }

    #[test]
    fn nan_charges_with_warn_policy_report_not_converged() {
        let grid: BrokenGrid = BrokenGrid { grid: get_grid() };
        let system: MolecularSystem = get_system(&grid.grid);
        let db: ProAtomDB = get_db();
        let settings = IterationSettings {
            max_iterations: 3,
            policy: ConvergencePolicy::Warn,
            ..IterationSettings::default()
        };
        let mut hirshfeld_i = HirshfeldI::new(&system, &grid, &db)
            .unwrap()
            .with_settings(settings);
        hirshfeld_i.run().unwrap();
        match hirshfeld_i.status() {
            IterationStatus::NotConverged { iterations, delta } => {
                assert_eq!(iterations, 1);
                assert!(delta.is_nan());
            }
            status => panic!("unexpected status {:?}", status),
        }
        assert!(hirshfeld_i.charges().iter().all(|q| q.is_nan()));
    }
}
