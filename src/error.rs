use std::path::PathBuf;
use thiserror::Error;

/// Errors of the density partitioning.
///
/// The variants fall into four groups: configuration errors that are raised when a
/// scheme is constructed (shape mismatches, invalid transforms or grids), reference data
/// errors that are raised during a run if the pro-atom database cannot provide a required
/// pro-atom, positivity violations of the pro-atom densities and the non-convergence
/// of the iterative Hirshfeld scheme.
#[derive(Error, Debug)]
pub enum PartitionError {
    /// Two inputs that should describe the same number of atoms or grid points do not.
    #[error("Arguments {what} represent different numbers of elements: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The initial pro-charges do not have one entry per atom.
    #[error("Argument pro-charges should have length {expected}, found {found}")]
    ProChargesLength { expected: usize, found: usize },

    #[error("Invalid radial transform: {0}")]
    InvalidTransform(String),

    #[error("Invalid radial density profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid molecular grid: {0}")]
    InvalidGrid(String),

    /// The molecular density contains NaN or infinite values.
    #[error("Molecular density is not finite on {count} grid points")]
    NonFiniteDensity { count: usize },

    /// No pro-atom with this atomic number and charge is present in the database.
    #[error("ProAtom with number={number} & charge={charge} does not exist")]
    MissingProAtom { number: u8, charge: i32 },

    /// The database holds more than one pro-atom with the same atomic number and charge.
    #[error("{count} ProAtoms with number={number} & charge={charge} exist, cannot decide what to do")]
    AmbiguousProAtom { number: u8, charge: i32, count: usize },

    /// The fractional pro-charge of an atom cannot be bracketed by the reference charges
    /// in the database.
    #[error("Cannot make pro-atom {index} (number={number}, charge={charge})")]
    DegenerateExpansion { index: usize, number: u8, charge: f64 },

    /// A pro-atom or interpolated density is zero or negative on at least one point.
    /// This signals corrupted reference data or a transform that does not match the profile.
    #[error("Density of {context} is not positive on {count} grid points")]
    NonPositiveDensity { context: String, count: usize },

    /// The iterative Hirshfeld scheme did not reach the charge tolerance.
    #[error("Hirshfeld-I failed to converge after {iterations} iterations. Final charge difference: {delta:.2e}")]
    NotConverged { iterations: usize, delta: f64 },

    #[error("Unknown partitioning scheme '{0}', expected 'h' or 'hi'")]
    UnknownScheme(String),

    #[error("Failed to deserialize TOML configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
