use acs_instance::{AcsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Ants (tours) per generation.
    pub n_ants: usize,
    /// Generations to run. There is no early stopping.
    pub iterations: usize,
    /// Fraction of every trail kept per generation, in `(0, 1)`.
    pub decay: f64,
    /// Exponent on the pheromone trail.
    pub alpha: f64,
    /// Exponent on the inverse distance.
    pub beta: f64,
    /// Probability of the greedy choice over a weighted draw, in `[0, 1]`.
    pub q0: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            n_ants: 10,
            iterations: 100,
            decay: 0.95,
            alpha: 1.0,
            beta: 2.0,
            q0: 0.9,
        }
    }
}

impl SolverConfig {
    /// Overlays a hyperparameter map on the defaults and validates the result.
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        // missing keys fall back to `Default` through `#[serde(default)]`
        let merged_params = Value::Object(hyperparameters.clone().unwrap_or_default());
        let config: Self = serde_json::from_value(merged_params)
            .map_err(|e| AcsError::InvalidInput(format!("Invalid hyperparameters: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(AcsError::InvalidInput(msg));
        if self.n_ants < 1 {
            return invalid(format!("n_ants must be at least 1 (got {})", self.n_ants));
        }
        if self.iterations < 1 {
            return invalid(format!(
                "iterations must be at least 1 (got {})",
                self.iterations
            ));
        }
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return invalid(format!("decay must be in (0, 1) (got {})", self.decay));
        }
        if !(0.0..=1.0).contains(&self.q0) {
            return invalid(format!("q0 must be in [0, 1] (got {})", self.q0));
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!(
                    "{} must be finite and non-negative (got {})",
                    name, value
                ));
            }
        }
        Ok(())
    }
}
