use crate::defaults::*;
use crate::error::PartitionError;
use crate::partition::{ConvergencePolicy, IterationSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_scheme() -> String {
    String::from(SCHEME)
}
fn default_min_dens() -> f64 {
    MIN_DENS
}
fn default_hi_max_iter() -> usize {
    HI_MAX_ITER
}
fn default_hi_charge_conv() -> f64 {
    HI_CHARGE_CONV
}
fn default_hi_policy() -> ConvergencePolicy {
    match HI_POLICY {
        "warn" => ConvergencePolicy::Warn,
        _ => ConvergencePolicy::Fail,
    }
}
fn default_hi_config() -> HirshfeldIConfig {
    HirshfeldIConfig {
        max_iterations: default_hi_max_iter(),
        charge_conv: default_hi_charge_conv(),
        policy: default_hi_policy(),
    }
}

/// Settings of a partitioning job, read from a TOML file. Every missing entry is
/// replaced by its default value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Configuration {
    /// "h" (Hirshfeld) or "hi" (Hirshfeld-I)
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_min_dens")]
    pub min_dens: f64,
    #[serde(default = "default_hi_config")]
    pub hi: HirshfeldIConfig,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct HirshfeldIConfig {
    #[serde(default = "default_hi_max_iter")]
    pub max_iterations: usize,
    #[serde(default = "default_hi_charge_conv")]
    pub charge_conv: f64,
    #[serde(default = "default_hi_policy")]
    pub policy: ConvergencePolicy,
}

impl Configuration {
    /// Read the configuration file from the working directory. If it does not exist,
    /// the default settings are used.
    pub fn load() -> Result<Self, PartitionError> {
        let config_file_path: &Path = Path::new(CONFIG_FILE_NAME);
        if config_file_path.exists() {
            Self::from_file(config_file_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, PartitionError> {
        let config_string: String = fs::read_to_string(path).map_err(|source| PartitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&config_string)
    }

    pub fn from_str(config_string: &str) -> Result<Self, PartitionError> {
        let config: Self = toml::from_str(config_string)?;
        Ok(config)
    }

    pub fn iteration_settings(&self) -> IterationSettings {
        IterationSettings {
            max_iterations: self.hi.max_iterations,
            tolerance: self.hi.charge_conv,
            policy: self.hi.policy,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            min_dens: default_min_dens(),
            hi: default_hi_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Configuration = Configuration::from_str("").unwrap();
        assert_eq!(config, Configuration::default());
        assert_eq!(config.scheme, "h");
        assert_eq!(config.min_dens, 1.0e-100);
        assert_eq!(config.iteration_settings(), IterationSettings::default());
    }

    #[test]
    fn partial_hi_section() {
        let config: Configuration = Configuration::from_str(
            "scheme = \"hi\"\n\n[hi]\nmax_iterations = 25\npolicy = \"warn\"\n",
        )
        .unwrap();
        assert_eq!(config.scheme, "hi");
        assert_eq!(config.hi.max_iterations, 25);
        assert_eq!(config.hi.charge_conv, HI_CHARGE_CONV);
        assert_eq!(config.hi.policy, ConvergencePolicy::Warn);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(matches!(
            Configuration::from_str("scheme = 3"),
            Err(PartitionError::Config(_))
        ));
    }

    #[test]
    fn settings_survive_a_round_trip_through_toml() {
        let config: Configuration = Configuration::from_str("min_dens = 1e-50").unwrap();
        let text: String = toml::to_string(&config).unwrap();
        assert_eq!(Configuration::from_str(&text).unwrap(), config);
    }
}
