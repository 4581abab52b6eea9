use crate::error::PartitionError;
use crate::proatom::AtomInterpolator;
use ndarray::prelude::*;
use std::fmt;

/// Tags that identify a pro-atom: the atomic number and the net charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProAtomKey {
    pub number: u8,
    pub charge: i32,
}

impl ProAtomKey {
    pub fn new(number: u8, charge: i32) -> Self {
        Self { number, charge }
    }

    /// Number of electrons of the pro-atom.
    pub fn n_elec(&self) -> i32 {
        self.number as i32 - self.charge
    }
}

impl fmt::Display for ProAtomKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "number={} charge={:+}", self.number, self.charge)
    }
}

/// Reference density of an isolated atom (or ion) together with its tags.
/// Two records are equal if their tags are equal.
#[derive(Debug, Clone)]
pub struct ProAtomRecord {
    interpolator: AtomInterpolator,
    key: ProAtomKey,
}

impl ProAtomRecord {
    pub fn new(interpolator: AtomInterpolator, number: u8, charge: i32) -> Self {
        Self {
            interpolator,
            key: ProAtomKey::new(number, charge),
        }
    }

    pub fn key(&self) -> ProAtomKey {
        self.key
    }

    pub fn number(&self) -> u8 {
        self.key.number
    }

    pub fn charge(&self) -> i32 {
        self.key.charge
    }

    pub fn interpolator(&self) -> &AtomInterpolator {
        &self.interpolator
    }

    /// Density of the pro-atom located at `center` evaluated on `points`.
    pub fn evaluate(
        &self,
        center: ArrayView1<f64>,
        points: ArrayView2<f64>,
    ) -> Result<Array1<f64>, PartitionError> {
        self.interpolator.evaluate(center, points)
    }
}

impl PartialEq for ProAtomRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ProAtomRecord {}
