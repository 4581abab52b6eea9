mod database;
mod interpolator;
mod record;

pub use database::ProAtomDB;
pub use interpolator::AtomInterpolator;
pub use record::{ProAtomKey, ProAtomRecord};
