//! Shared solver environment.

use std::sync::Arc;

use highs_sys::HighsInt;
use mpsolve_solver::SolverConfig;

use crate::ffi::highs_version;

/// Largest integer value the engine accepts as a bound or option.
pub const MAX_INTEGER: i64 = HighsInt::MAX as i64;

/// Bound value the engine treats as unbounded.
pub const INFINITY: f64 = f64::INFINITY;

#[derive(Debug)]
struct EnvironmentInner {
    config: SolverConfig,
    version: Option<String>,
}

/// Cheaply clonable handle every [`crate::Program`] is created from.
///
/// Carries the default configuration new programs start with.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Arc<EnvironmentInner>,
}

impl Environment {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Environment whose programs start from `config`.
    pub fn with_config(config: SolverConfig) -> Self {
        let version = highs_version();
        tracing::debug!(
            component = "solver",
            operation = "init_environment",
            status = "success",
            highs_version = version.as_deref().unwrap_or("unknown"),
            "Created solver environment"
        );
        Self {
            inner: Arc::new(EnvironmentInner { config, version }),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.inner.config
    }

    /// Engine version string, when the library reports one.
    pub fn version(&self) -> Option<&str> {
        self.inner.version.as_deref()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_carries_config() {
        let env = Environment::with_config(SolverConfig::new().with_threads(2));
        let clone = env.clone();
        assert_eq!(clone.config().threads, Some(2));
        assert!(env.version().is_some());
    }

    #[test]
    fn test_limits() {
        assert!(MAX_INTEGER >= i64::from(i32::MAX));
        assert!(INFINITY.is_infinite());
    }
}
