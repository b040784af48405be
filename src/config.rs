use serde::{Deserialize, Serialize};

/// What a ratio evaluates to when its denominator energy is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroEnergyPolicy {
    /// `x / 0` is `+inf` for `x > 0`; `0 / 0` is still an error.
    #[default]
    Infinity,
    /// Every zero denominator is an [`EvalError::UndefinedMetric`](crate::EvalError::UndefinedMetric).
    Error,
}

/// Numerical knobs for an evaluation.
///
/// Deserializes from partial JSON, e.g. `{"zero_energy_policy": "error"}`;
/// missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Singular values `<= rcond * sigma_max` are dropped from projection
    /// bases. `None` means `max(rows, cols) * f64::EPSILON`.
    pub rcond: Option<f64>,

    /// An energy `<= zero_energy_tolerance * energy(estimated)` counts as zero.
    pub zero_energy_tolerance: f64,

    pub zero_energy_policy: ZeroEnergyPolicy,
}

pub const DEFAULT_ZERO_ENERGY_TOLERANCE: f64 = 1e-20;

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            rcond: None,
            zero_energy_tolerance: DEFAULT_ZERO_ENERGY_TOLERANCE,
            zero_energy_policy: ZeroEnergyPolicy::default(),
        }
    }
}

impl EvaluationOptions {
    /// Parse options from a JSON document.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Effective singular-value cut-off for a `rows x cols` basis.
    pub fn rcond_for(&self, rows: usize, cols: usize) -> f64 {
        self.rcond
            .unwrap_or_else(|| rows.max(cols) as f64 * f64::EPSILON)
    }
}
