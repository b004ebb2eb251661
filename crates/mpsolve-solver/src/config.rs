//! Solver configuration types.
//!
//! Configuration can be assembled with the `with_*` builders or loaded
//! from TOML:
//!
//! ```
//! use mpsolve_solver::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     time_limit = 30.0
//!     threads = 4
//!     output = true
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit, Some(30.0));
//! assert_eq!(config.threads, Some(4));
//! assert!(config.output);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Thread count that lets the engine pick its own parallelism.
pub const AUTO_THREADING: u32 = 0;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration options for solver behavior.
///
/// Every knob is independent and may be changed any time before a solve.
/// `None` keeps the engine default, except for `output`, which is off unless
/// explicitly enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Maximum number of improving feasible solutions before stopping.
    pub max_solution_count: Option<u32>,
    /// Number of threads. [`AUTO_THREADING`] lets the engine decide.
    pub threads: Option<u32>,
    /// Random seed for reproducible runs.
    pub seed: Option<u32>,
    /// Engine log output.
    pub output: bool,
    /// Worst objective value a recorded solution may have.
    pub cutoff: Option<f64>,
    /// Relative MIP gap tolerance.
    pub mip_gap: Option<f64>,
    /// Enable/disable presolve.
    pub presolve: Option<bool>,
    /// Primal and dual feasibility tolerance.
    pub tolerance: Option<f64>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML, or
    /// holds out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Reject values the engine would refuse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.time_limit
            && (limit.is_nan() || limit < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "time_limit must be non-negative, got {limit}"
            )));
        }
        if let Some(gap) = self.mip_gap
            && (gap.is_nan() || gap < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "mip_gap must be non-negative, got {gap}"
            )));
        }
        if let Some(tol) = self.tolerance
            && !(tol > 0.0 && tol.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be positive and finite, got {tol}"
            )));
        }
        if self.max_solution_count == Some(0) {
            return Err(ConfigError::Invalid(
                "max_solution_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Stop after this many improving solutions.
    pub fn with_max_solution_count(mut self, count: u32) -> Self {
        self.max_solution_count = Some(count);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable engine output.
    pub fn with_output(mut self, enabled: bool) -> Self {
        self.output = enabled;
        self
    }

    pub fn with_cutoff(mut self, bound: f64) -> Self {
        self.cutoff = Some(bound);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Enable or disable presolve.
    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    /// Set the feasibility tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_is_empty_and_silent() {
        let config = SolverConfig::new();
        assert!(config.is_empty());
        assert!(!config.output);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = SolverConfig::new()
            .with_time_limit(60.0)
            .with_max_solution_count(3)
            .with_threads(AUTO_THREADING)
            .with_seed(42)
            .with_output(true)
            .with_cutoff(100.0)
            .with_mip_gap(0.01)
            .with_presolve(false)
            .with_tolerance(1e-6);

        assert!(!config.is_empty());
        assert_eq!(config.time_limit, Some(60.0));
        assert_eq!(config.max_solution_count, Some(3));
        assert_eq!(config.threads, Some(0));
        assert_eq!(config.seed, Some(42));
        assert!(config.output);
        assert_eq!(config.cutoff, Some(100.0));
        assert_eq!(config.mip_gap, Some(0.01));
        assert_eq!(config.presolve, Some(false));
        assert_eq!(config.tolerance, Some(1e-6));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SolverConfig::from_toml_str("seed = 7\npresolve = true\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.presolve, Some(true));
        assert_eq!(config.time_limit, None);
        assert!(!config.output);
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        let err = SolverConfig::from_toml_str("time_limit = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SolverConfig::from_toml_str("max_solution_count = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SolverConfig::from_toml_str("threads = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_toml_roundtrip_preserves_fields() {
        let config = SolverConfig::new().with_time_limit(5.0).with_seed(3);
        let text = config.to_toml_string().unwrap();
        let parsed = SolverConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("mpsolve-config-does-not-exist.toml");
        let err = SolverConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "mpsolve-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "time_limit = 12.5\noutput = true\n").unwrap();
        let config = SolverConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.time_limit, Some(12.5));
        assert!(config.output);
    }
}
