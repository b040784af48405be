//! Source-separation quality metrics for beamformer outputs.
//!
//! A [`BeamformingEvaluation`] splits an estimated signal into target,
//! interference, noise and artifact components by orthogonal projection onto
//! nested subspaces, and derives SDR, SIR, SNR and SAR from their energies.
//!
//! ```no_run
//! use beam_eval::BeamformingEvaluation;
//!
//! # fn main() -> Result<(), beam_eval::EvalError> {
//! let source = vec![0.0, 1.0, 0.0, -1.0];
//! let interferer = vec![1.0, 0.0, -1.0, 0.0];
//! let estimate = vec![0.1, 1.0, -0.1, -1.0];
//!
//! let ev = BeamformingEvaluation::new(&estimate, &source, &[interferer], None)?;
//! println!("SIR = {:.1} dB", ev.sir()?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod report;
pub mod signal;
pub mod synth;

pub use config::{EvaluationOptions, ZeroEnergyPolicy};
pub use error::{EvalError, Metric};
pub use evaluation::{BeamformingEvaluation, ComponentEnergies};
pub use report::{EvaluationReport, MetricValue};
pub use signal::project;
