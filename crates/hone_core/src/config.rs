use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};

/// Parameters shared by every realization of an ensemble run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Embedding dimensionality.
    pub dim: usize,
    /// Maximum number of steps per realization.
    pub iterations: usize,
    /// Number of realizations; seeds run over `0..ensemble_size`.
    pub ensemble_size: usize,
    /// Convergence threshold on the summed per-step node displacement.
    pub tol: f64,
    pub dt: f64,
    /// Spatial damping.
    pub gamma: f64,
    /// Phase damping.
    pub gamma_theta: f64,
    /// Kuramoto coupling strength `K`.
    #[serde(alias = "K")]
    pub coupling_strength: f64,
    /// Worker threads in the ensemble pool; `None` lets rayon pick.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            dim: 2,
            iterations: 100,
            ensemble_size: 100,
            tol: 1e-4,
            dt: 0.01,
            gamma: 1.0,
            gamma_theta: 0.1,
            coupling_strength: 0.5,
            workers: None,
        }
    }
}

impl EnsembleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            invalid!(InvalidConfiguration, "Embedding dimension must be at least 1.");
        }
        if self.iterations == 0 {
            invalid!(InvalidConfiguration, "iterations must be greater than zero.");
        }
        if self.ensemble_size == 0 {
            invalid!(InvalidConfiguration, "ensemble_size must be greater than zero.");
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            invalid!(InvalidConfiguration, "Step size dt must be positive and finite.");
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            invalid!(InvalidConfiguration, "Tolerance must be non-negative.");
        }
        for (name, value) in [
            ("gamma", self.gamma),
            ("gamma_theta", self.gamma_theta),
            ("coupling_strength", self.coupling_strength),
        ] {
            if !value.is_finite() {
                invalid!(InvalidConfiguration, "{} must be finite, got {}.", name, value);
            }
        }
        if self.workers == Some(0) {
            invalid!(InvalidConfiguration, "Worker pool needs at least one thread.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EnsembleConfig;

    fn assert_err_contains<T: std::fmt::Debug>(result: crate::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn defaults_are_valid() {
        let config = EnsembleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dim, 2);
        assert_eq!(config.ensemble_size, 100);
        assert_eq!(config.coupling_strength, 0.5);
    }

    #[test]
    fn validate_rejects_invalid_settings() {
        let base = EnsembleConfig::default();

        assert_err_contains(EnsembleConfig { dim: 0, ..base }.validate(), "dimension");
        assert_err_contains(EnsembleConfig { iterations: 0, ..base }.validate(), "iterations");
        assert_err_contains(
            EnsembleConfig { ensemble_size: 0, ..base }.validate(),
            "ensemble_size",
        );
        assert_err_contains(EnsembleConfig { dt: 0.0, ..base }.validate(), "dt must be positive");
        assert_err_contains(EnsembleConfig { dt: -0.1, ..base }.validate(), "dt must be positive");
        assert_err_contains(
            EnsembleConfig { dt: f64::INFINITY, ..base }.validate(),
            "dt must be positive",
        );
        assert_err_contains(EnsembleConfig { tol: -1e-3, ..base }.validate(), "Tolerance");
        assert_err_contains(EnsembleConfig { tol: f64::NAN, ..base }.validate(), "Tolerance");
        assert_err_contains(
            EnsembleConfig { gamma: f64::NAN, ..base }.validate(),
            "gamma must be finite",
        );
        assert_err_contains(
            EnsembleConfig { coupling_strength: f64::INFINITY, ..base }.validate(),
            "coupling_strength",
        );
        assert_err_contains(
            EnsembleConfig { workers: Some(0), ..base }.validate(),
            "at least one thread",
        );
    }

    #[test]
    fn zero_tolerance_is_allowed() {
        let config = EnsembleConfig { tol: 0.0, ..EnsembleConfig::default() };
        assert!(config.validate().is_ok());
    }
}
