use crate::proatom::{ProAtomKey, ProAtomRecord};
use hashbrown::HashMap;
use itertools::Itertools;
use log::debug;

/// Immutable collection of pro-atom records.
///
/// The records are indexed by their (number, charge) tags when the database is created,
/// so that exact-match queries do not scan the whole collection. Duplicated tags are
/// kept, it is up to the caller to decide what to do with ambiguous queries.
#[derive(Debug, Clone)]
pub struct ProAtomDB {
    records: Vec<ProAtomRecord>,
    index: HashMap<ProAtomKey, Vec<usize>>,
}

impl ProAtomDB {
    pub fn new(records: Vec<ProAtomRecord>) -> Self {
        let mut index: HashMap<ProAtomKey, Vec<usize>> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            index.entry(record.key()).or_insert_with(Vec::new).push(i);
        }
        debug!(
            "pro-atom database with {} records for elements {:?}",
            records.len(),
            records.iter().map(|r| r.number()).unique().sorted().collect::<Vec<u8>>()
        );
        Self { records, index }
    }

    /// Number of pro-atom records in the database.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProAtomRecord> {
        self.records.iter()
    }

    /// All records with exactly this atomic number and charge. The result is empty if no
    /// such record exists.
    pub fn get_records(&self, number: u8, charge: i32) -> Vec<&ProAtomRecord> {
        match self.index.get(&ProAtomKey::new(number, charge)) {
            Some(indices) => indices.iter().map(|i| &self.records[*i]).collect(),
            None => Vec::new(),
        }
    }

    /// All records of one element, sorted by charge.
    pub fn records_of(&self, number: u8) -> Vec<&ProAtomRecord> {
        self.records
            .iter()
            .filter(|r| r.number() == number)
            .sorted_by_key(|r| r.charge())
            .collect()
    }

    /// Sorted atomic numbers present in the database.
    pub fn numbers(&self) -> Vec<u8> {
        self.index.keys().map(|k| k.number).unique().sorted().collect()
    }

    /// Sorted charges for which records of the element exist.
    pub fn charges(&self, number: u8) -> Vec<i32> {
        self.index
            .keys()
            .filter(|k| k.number == number)
            .map(|k| k.charge)
            .sorted()
            .collect()
    }
}
