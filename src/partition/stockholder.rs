use crate::error::PartitionError;
use crate::grid::Grid;
use crate::partition::MolecularSystem;
use log::{debug, trace};
use ndarray::prelude::*;
use rayon::prelude::*;

/// Capability of a stockholder scheme: the density of the pro-atom with the given index
/// on the grid points. The returned density must be positive on every point.
pub trait ProAtomModel: Sync {
    fn compute_proatom_density(
        &self,
        index: usize,
        system: &MolecularSystem,
        points: ArrayView2<f64>,
    ) -> Result<Array1<f64>, PartitionError>;
}

/// Arrays that are recomputed in every run of a stockholder partitioning.
#[derive(Debug, Clone)]
pub struct PartitionState {
    /// atomic weight functions, shape (natoms, npoints)
    pub weights: Array2<f64>,
    /// pro-molecule density
    pub prodens: Array1<f64>,
    pub populations: Array1<f64>,
    pub charges: Array1<f64>,
}

impl PartitionState {
    pub fn new(natoms: usize, npoints: usize) -> Self {
        Self {
            weights: Array2::zeros([natoms, npoints]),
            prodens: Array1::zeros(npoints),
            populations: Array1::zeros(natoms),
            charges: Array1::zeros(natoms),
        }
    }
}

/// Stockholder partitioning of the molecular density.
///
/// The molecular density is shared among the atoms in proportion to their pro-atom
/// densities: w_A(r) = rho_A(r) / sum_B rho_B(r). The scheme specific pro-atoms are
/// provided by a [ProAtomModel].
#[derive(Debug, Clone)]
pub struct Stockholder<'a, G: Grid> {
    system: &'a MolecularSystem,
    grid: &'a G,
    min_dens: f64,
    state: PartitionState,
}

impl<'a, G: Grid> Stockholder<'a, G> {
    pub fn new(system: &'a MolecularSystem, grid: &'a G, min_dens: f64) -> Result<Self, PartitionError> {
        if grid.size() != system.density().len() {
            return Err(PartitionError::ShapeMismatch {
                what: "density & grid",
                expected: grid.size(),
                found: system.density().len(),
            });
        }
        if grid.points().nrows() != grid.size() {
            return Err(PartitionError::ShapeMismatch {
                what: "grid points & grid size",
                expected: grid.size(),
                found: grid.points().nrows(),
            });
        }
        Ok(Self {
            system,
            grid,
            min_dens,
            state: PartitionState::new(system.natoms(), grid.size()),
        })
    }

    /// Compute the pro-atom densities of all atoms with the `model` and partition the
    /// molecular density.
    pub fn run<M: ProAtomModel>(&mut self, model: &M) -> Result<(), PartitionError> {
        let natoms: usize = self.system.natoms();
        let points: ArrayView2<f64> = self.grid.points();
        let system: &MolecularSystem = self.system;
        // the pro-atoms only read shared data, so they are evaluated in parallel
        let proatoms: Vec<Array1<f64>> = (0..natoms)
            .into_par_iter()
            .map(|index| model.compute_proatom_density(index, system, points))
            .collect::<Result<Vec<Array1<f64>>, PartitionError>>()?;
        let mut weights: Array2<f64> = Array2::zeros([natoms, self.grid.size()]);
        for (index, dens) in proatoms.into_iter().enumerate() {
            if dens.len() != self.grid.size() {
                return Err(PartitionError::ShapeMismatch {
                    what: "pro-atom density & grid",
                    expected: self.grid.size(),
                    found: dens.len(),
                });
            }
            weights.row_mut(index).assign(&dens);
        }
        self.state = PartitionState::new(natoms, self.grid.size());
        self.state.weights = weights;
        self.compute_stockholder_partition();
        Ok(())
    }

    /// Normalize the pro-atom densities, stored in the weights, by the pro-molecule density
    /// and integrate the atomic populations and charges.
    fn compute_stockholder_partition(&mut self) {
        let min_dens: f64 = self.min_dens;
        // pro-molecule density
        let mut prodens: Array1<f64> = self.state.weights.sum_axis(Axis(0));
        let n_floored: usize = prodens.iter().filter(|x| **x < min_dens).count();
        if n_floored > 0 {
            debug!("pro-molecule density is raised to {:e} on {} grid points", min_dens, n_floored);
        }
        prodens.mapv_inplace(|x| x.max(min_dens));
        // atomic weights
        self.state.weights /= &prodens;
        // atomic populations & charges
        let density: ArrayView1<f64> = self.system.density();
        let grid: &G = self.grid;
        let mut populations: Array1<f64> = self
            .state
            .weights
            .outer_iter()
            .map(|w| grid.integrate((&w * &density).view()))
            .collect();
        let numbers: Array1<f64> = self.system.numbers().iter().map(|z| *z as f64).collect();
        populations += &(&numbers - &self.system.pseudo_numbers());
        self.state.charges = &numbers - &populations;
        self.state.populations = populations;
        self.state.prodens = prodens;
        trace!("stockholder charges: {}", self.state.charges);
    }

    pub fn system(&self) -> &MolecularSystem {
        self.system
    }

    pub fn grid(&self) -> &G {
        self.grid
    }

    pub fn min_dens(&self) -> f64 {
        self.min_dens
    }

    pub fn set_min_dens(&mut self, min_dens: f64) {
        self.min_dens = min_dens;
    }

    pub fn state(&self) -> &PartitionState {
        &self.state
    }

    pub fn weights(&self) -> ArrayView2<f64> {
        self.state.weights.view()
    }

    pub fn prodens(&self) -> ArrayView1<f64> {
        self.state.prodens.view()
    }

    pub fn populations(&self) -> ArrayView1<f64> {
        self.state.populations.view()
    }

    pub fn charges(&self) -> ArrayView1<f64> {
        self.state.charges.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::MIN_DENS;
    use crate::grid::MolecularGrid;
    use approx::AbsDiffEq;

    /// Pro-atoms given as fixed rows on the grid points.
    struct TableModel {
        rows: Array2<f64>,
    }

    impl ProAtomModel for TableModel {
        fn compute_proatom_density(
            &self,
            index: usize,
            _system: &MolecularSystem,
            _points: ArrayView2<f64>,
        ) -> Result<Array1<f64>, PartitionError> {
            Ok(self.rows.row(index).to_owned())
        }
    }

    fn line_grid(n: usize) -> MolecularGrid {
        let points: Array2<f64> = Array2::from_shape_fn([n, 3], |(i, k)| if k == 0 { i as f64 } else { 0.0 });
        MolecularGrid::new(points, Array1::from_elem(n, 0.5)).unwrap()
    }

    #[test]
    fn weights_sum_to_one_and_charges_follow_populations() {
        let grid: MolecularGrid = line_grid(4);
        let system: MolecularSystem = MolecularSystem::new(
            array![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]],
            vec![8, 1],
            array![6.0, 1.0],
            array![4.0, 2.0, 2.0, 1.0],
        )
        .unwrap();
        let model: TableModel = TableModel {
            rows: array![[3.0, 1.0, 1.0, 1.0], [1.0, 1.0, 3.0, 3.0]],
        };
        let mut engine = Stockholder::new(&system, &grid, MIN_DENS).unwrap();
        engine.run(&model).unwrap();

        assert!(engine
            .weights()
            .sum_axis(Axis(0))
            .abs_diff_eq(&Array1::ones(4), 1e-12));
        assert!(engine.prodens().abs_diff_eq(&array![4.0, 2.0, 4.0, 4.0], 1e-12));
        assert!(engine
            .weights()
            .abs_diff_eq(&array![[0.75, 0.5, 0.25, 0.25], [0.25, 0.5, 0.75, 0.75]], 1e-12));
        // populations: 0.5 * sum(w * rho) + (Z - Z_pseudo)
        let expected_pop: Array1<f64> = array![0.5 * (3.0 + 1.0 + 0.5 + 0.25) + 2.0, 0.5 * (1.0 + 1.0 + 1.5 + 0.75)];
        assert!(engine.populations().abs_diff_eq(&expected_pop, 1e-12));
        let numbers: Array1<f64> = array![8.0, 1.0];
        assert_eq!(engine.charges(), &numbers - &engine.populations());
    }

    #[test]
    fn tiny_promolecule_density_is_floored() {
        let grid: MolecularGrid = line_grid(3);
        let system: MolecularSystem =
            MolecularSystem::all_electron(array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], vec![1, 1], array![1.0, 1.0, 1.0])
                .unwrap();
        let model: TableModel = TableModel {
            rows: array![[1.0, 1.0e-12, 2.0], [1.0, 1.0e-12, 2.0]],
        };
        let mut engine = Stockholder::new(&system, &grid, 1.0e-6).unwrap();
        engine.run(&model).unwrap();
        assert!(engine.prodens().abs_diff_eq(&array![2.0, 1.0e-6, 4.0], 1e-15));
        // weights do not sum to one where the pro-molecule density was floored
        let sums: Array1<f64> = engine.weights().sum_axis(Axis(0));
        assert!((sums[0] - 1.0).abs() < 1e-12);
        assert!(sums[1] < 1.0e-5);
        assert!((sums[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn density_and_grid_must_match() {
        let grid: MolecularGrid = line_grid(3);
        let system: MolecularSystem =
            MolecularSystem::all_electron(array![[0.0, 0.0, 0.0]], vec![1], array![1.0, 1.0]).unwrap();
        assert!(Stockholder::new(&system, &grid, MIN_DENS).is_err());
    }

    #[test]
    fn rerun_is_reproducible() {
        let grid: MolecularGrid = line_grid(4);
        let system: MolecularSystem = MolecularSystem::all_electron(
            array![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]],
            vec![1, 1],
            array![0.3, 0.2, 0.2, 0.3],
        )
        .unwrap();
        let model: TableModel = TableModel {
            rows: array![[0.7, 0.3, 0.2, 0.1], [0.1, 0.2, 0.3, 0.7]],
        };
        let mut engine = Stockholder::new(&system, &grid, MIN_DENS).unwrap();
        engine.run(&model).unwrap();
        let first: Array1<f64> = engine.charges().to_owned();
        engine.run(&model).unwrap();
        assert_eq!(first, engine.charges());
    }
}
