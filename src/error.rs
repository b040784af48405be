use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Metric – which energy ratio an error refers to
// ---------------------------------------------------------------------------

/// The four BSS-Eval style energy ratios.
///
/// Serializes as `"SDR"`, `"SIR"`, `"SNR"`, `"SAR"`, also when used as a map
/// key (see [`EvaluationReport::metrics`](crate::EvaluationReport::metrics)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Metric {
    Sdr,
    Sir,
    Snr,
    Sar,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Sdr, Metric::Sir, Metric::Snr, Metric::Sar];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Sdr => "SDR",
            Metric::Sir => "SIR",
            Metric::Snr => "SNR",
            Metric::Sar => "SAR",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// EvalError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A signal is shorter than the estimate it must be aligned with.
    #[error("{signal} has {actual} samples, expected at least {expected}")]
    Dimension {
        signal: String,
        expected: usize,
        actual: usize,
    },

    #[error("{metric} is undefined: denominator energy is zero")]
    UndefinedMetric { metric: Metric },

    #[error("{signal}[{index}] is not a finite sample")]
    NonFinite { signal: String, index: usize },

    #[error("estimated signal is empty")]
    EmptySignal,

    #[error("SVD of the projection basis did not converge")]
    SvdNotConverged,
}
