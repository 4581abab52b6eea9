use crate::defaults::{INTEGER_CHARGE_TOL, MIN_DENS};
use crate::error::PartitionError;
use crate::grid::Grid;
use crate::partition::{MolecularSystem, PartitionScheme, ProAtomModel, Stockholder};
use crate::proatom::{ProAtomDB, ProAtomRecord};
use log::{debug, warn};
use ndarray::prelude::*;

/// Linear combination of database pro-atoms that makes up one pro-atom.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisExpansion<'a> {
    terms: Vec<(&'a ProAtomRecord, f64)>,
}

impl<'a> BasisExpansion<'a> {
    fn single(record: &'a ProAtomRecord, coeff: f64) -> Self {
        Self {
            terms: vec![(record, coeff)],
        }
    }

    pub fn terms(&self) -> &[(&'a ProAtomRecord, f64)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficient of the record with the given charge, if it is part of the expansion.
    pub fn coefficient(&self, charge: i32) -> Option<f64> {
        self.terms
            .iter()
            .find(|(record, _)| record.charge() == charge)
            .map(|(_, coeff)| *coeff)
    }
}

/// Pro-atoms of the Hirshfeld scheme: database pro-atoms at the (possibly fractional)
/// pro-charges of the atoms.
#[derive(Debug, Clone)]
pub struct HirshfeldModel<'a> {
    proatomdb: &'a ProAtomDB,
    procharges: Array1<f64>,
}

impl<'a> HirshfeldModel<'a> {
    pub fn new(proatomdb: &'a ProAtomDB, procharges: Array1<f64>) -> Self {
        Self {
            proatomdb,
            procharges,
        }
    }

    pub fn procharges(&self) -> ArrayView1<f64> {
        self.procharges.view()
    }

    /// Expansion of the pro-atom with the given index (atomic number `number`) in
    /// database pro-atoms.
    ///
    /// For an integer pro-charge the expansion is the single record with this charge.
    /// A fractional charge q is interpolated linearly between the records at floor(q)
    /// and ceil(q). If ceil(q) equals the atomic number, the upper pro-atom has no
    /// electrons and only the lower record contributes.
    pub fn get_proatom_basis_expansion(
        &self,
        index: usize,
        number: u8,
    ) -> Result<BasisExpansion<'a>, PartitionError> {
        let charge: f64 = self.procharges[index];
        if !charge.is_finite() {
            return Err(PartitionError::DegenerateExpansion {
                index,
                number,
                charge,
            });
        }
        let rounded: f64 = charge.round();
        if (charge - rounded).abs() < INTEGER_CHARGE_TOL {
            let record: &ProAtomRecord = self.single_record(number, rounded as i32)?;
            return Ok(BasisExpansion::single(record, 1.0));
        }
        // lower and upper bound charge & coefficient
        let (lower_q, upper_q): (f64, f64) = (charge.floor(), charge.ceil());
        let (lower_c, upper_c): (f64, f64) = (upper_q - charge, charge - lower_q);
        let lower_b: Vec<&'a ProAtomRecord> = self.proatomdb.get_records(number, lower_q as i32);
        let upper_b: Vec<&'a ProAtomRecord> = self.proatomdb.get_records(number, upper_q as i32);
        if lower_b.len() == 1 && upper_b.len() == 1 {
            return Ok(BasisExpansion {
                terms: vec![(lower_b[0], lower_c), (upper_b[0], upper_c)],
            });
        }
        for (bound, records) in [(lower_q, &lower_b), (upper_q, &upper_b)].iter() {
            if records.len() > 1 {
                return Err(PartitionError::AmbiguousProAtom {
                    number,
                    charge: *bound as i32,
                    count: records.len(),
                });
            }
        }
        let z: f64 = number as f64;
        if lower_b.len() == 1 && z == upper_q {
            return Ok(BasisExpansion::single(lower_b[0], lower_c));
        }
        if lower_b.len() == 1 && z < upper_q {
            // no physical pro-atom exists at this charge. The zero coefficient leads to a
            // vanishing pro-atom density, which is rejected when the density is computed.
            warn!(
                "pro-charge {} of atom {} (number={}) exceeds the nuclear charge",
                charge, index, number
            );
            return Ok(BasisExpansion::single(lower_b[0], 0.0));
        }
        Err(PartitionError::DegenerateExpansion {
            index,
            number,
            charge,
        })
    }

    fn single_record(&self, number: u8, charge: i32) -> Result<&'a ProAtomRecord, PartitionError> {
        let records: Vec<&'a ProAtomRecord> = self.proatomdb.get_records(number, charge);
        match records.len() {
            0 => Err(PartitionError::MissingProAtom { number, charge }),
            1 => Ok(records[0]),
            count => Err(PartitionError::AmbiguousProAtom {
                number,
                charge,
                count,
            }),
        }
    }
}

impl<'a> ProAtomModel for HirshfeldModel<'a> {
    fn compute_proatom_density(
        &self,
        index: usize,
        system: &MolecularSystem,
        points: ArrayView2<f64>,
    ) -> Result<Array1<f64>, PartitionError> {
        let number: u8 = system.numbers()[index];
        let expansion: BasisExpansion = self.get_proatom_basis_expansion(index, number)?;
        let coordinates: ArrayView2<f64> = system.coordinates();
        let center: ArrayView1<f64> = coordinates.row(index);
        let mut dens: Array1<f64> = Array1::zeros(points.nrows());
        // make linear combination of basis
        for (proatom, coeff) in expansion.terms() {
            dens.scaled_add(*coeff, &proatom.evaluate(center, points)?);
        }
        let n_bad: usize = dens.iter().filter(|x| !(**x > 0.0)).count();
        if n_bad > 0 {
            return Err(PartitionError::NonPositiveDensity {
                context: format!("pro-atom {} (number={})", index, number),
                count: n_bad,
            });
        }
        Ok(dens)
    }
}

/// Hirshfeld partitioning with pro-atoms from a pro-atom database.
///
/// The pro-charges default to zero (neutral pro-atoms).
pub struct Hirshfeld<'a, G: Grid> {
    engine: Stockholder<'a, G>,
    model: HirshfeldModel<'a>,
}

impl<'a, G: Grid> Hirshfeld<'a, G> {
    pub fn new(
        system: &'a MolecularSystem,
        grid: &'a G,
        proatomdb: &'a ProAtomDB,
        procharges: Option<Array1<f64>>,
    ) -> Result<Self, PartitionError> {
        let engine: Stockholder<G> = Stockholder::new(system, grid, MIN_DENS)?;
        let procharges: Array1<f64> = match procharges {
            Some(q) => {
                check_procharges(system.natoms(), q.len())?;
                q
            }
            None => Array1::zeros(system.natoms()),
        };
        Ok(Self {
            engine,
            model: HirshfeldModel::new(proatomdb, procharges),
        })
    }

    /// Set the lower bound of the pro-molecule density.
    pub fn with_min_dens(mut self, min_dens: f64) -> Self {
        self.engine.set_min_dens(min_dens);
        self
    }

    /// Replace the pro-charges used in the next run.
    pub fn set_procharges(&mut self, procharges: Array1<f64>) -> Result<(), PartitionError> {
        check_procharges(self.engine.system().natoms(), procharges.len())?;
        self.model = HirshfeldModel::new(self.model.proatomdb, procharges);
        Ok(())
    }

    pub fn procharges(&self) -> ArrayView1<f64> {
        self.model.procharges()
    }

    pub fn proatomdb(&self) -> &'a ProAtomDB {
        self.model.proatomdb
    }

    pub fn min_dens(&self) -> f64 {
        self.engine.min_dens()
    }

    pub fn natoms(&self) -> usize {
        self.engine.system().natoms()
    }

    pub fn get_proatom_basis_expansion(&self, index: usize) -> Result<BasisExpansion<'a>, PartitionError> {
        let number: u8 = self.engine.system().numbers()[index];
        self.model.get_proatom_basis_expansion(index, number)
    }

    pub fn compute_proatom_density(&self, index: usize) -> Result<Array1<f64>, PartitionError> {
        self.model
            .compute_proatom_density(index, self.engine.system(), self.engine.grid().points())
    }
}

impl<'a, G: Grid> PartitionScheme for Hirshfeld<'a, G> {
    fn name(&self) -> &'static str {
        "h"
    }

    fn run(&mut self) -> Result<(), PartitionError> {
        debug!("Hirshfeld partitioning with pro-charges {}", self.model.procharges());
        self.engine.run(&self.model)
    }

    fn charges(&self) -> ArrayView1<f64> {
        self.engine.charges()
    }

    fn populations(&self) -> ArrayView1<f64> {
        self.engine.populations()
    }

    fn weights(&self) -> ArrayView2<f64> {
        self.engine.weights()
    }

    fn prodens(&self) -> ArrayView1<f64> {
        self.engine.prodens()
    }
}

fn check_procharges(natoms: usize, found: usize) -> Result<(), PartitionError> {
    if found != natoms {
        return Err(PartitionError::ProChargesLength {
            expected: natoms,
            found,
        });
    }
    Ok(())
}
