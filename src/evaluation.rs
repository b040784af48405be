use std::cell::OnceCell;

use log::debug;
use serde::Serialize;

use crate::config::{EvaluationOptions, ZeroEnergyPolicy};
use crate::error::{EvalError, Metric};
use crate::report::EvaluationReport;
use crate::signal::{add, energy, project, sub, AlignedSignals};

// ---------------------------------------------------------------------------
// ComponentEnergies
// ---------------------------------------------------------------------------

/// Sum-of-squares energy of each decomposition component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentEnergies {
    pub target: f64,
    pub interference: f64,
    pub noise: f64,
    pub artifacts: f64,
}

// ---------------------------------------------------------------------------
// BeamformingEvaluation
// ---------------------------------------------------------------------------

/// Evaluates a beamformer output against the clean source it should recover.
///
/// The estimate ŝ is split into
///
/// ```text
/// ŝ = s_target + e_interf + e_noise + e_artif
///
/// s_target = P_s ŝ
/// e_interf = P_{s,i} ŝ - s_target
/// e_noise  = P_{s,i,n} ŝ - (e_interf + s_target)
/// e_artif  = ŝ - (e_noise + e_interf + s_target)
/// ```
///
/// where `P_X` is the orthogonal projection onto the span of `X`. Every
/// component and ratio is computed on first access and cached for the
/// lifetime of the value.
///
/// The caches are `OnceCell`s, so an evaluation can move between threads
/// but cannot be shared by reference across them.
#[derive(Debug)]
pub struct BeamformingEvaluation {
    signals: AlignedSignals,
    options: EvaluationOptions,

    s_target: OnceCell<Vec<f64>>,
    e_interf: OnceCell<Vec<f64>>,
    e_noise: OnceCell<Vec<f64>>,
    e_artif: OnceCell<Vec<f64>>,

    sdr: OnceCell<f64>,
    sir: OnceCell<f64>,
    snr: OnceCell<f64>,
    sar: OnceCell<f64>,
}

impl BeamformingEvaluation {
    /// Build an evaluation with default [`EvaluationOptions`].
    ///
    /// * `estimated` – beamformer output; its length M fixes the window.
    /// * `real_source` – clean signal of interest, at least M samples.
    /// * `interference` – interfering signals, one `Vec` per signal, each at
    ///   least M samples. May be empty.
    /// * `noise` – optional noise signal of at least M samples.
    pub fn new(
        estimated: &[f64],
        real_source: &[f64],
        interference: &[Vec<f64>],
        noise: Option<&[f64]>,
    ) -> Result<Self, EvalError> {
        Self::with_options(
            estimated,
            real_source,
            interference,
            noise,
            EvaluationOptions::default(),
        )
    }

    pub fn with_options(
        estimated: &[f64],
        real_source: &[f64],
        interference: &[Vec<f64>],
        noise: Option<&[f64]>,
        options: EvaluationOptions,
    ) -> Result<Self, EvalError> {
        let signals = AlignedSignals::align(estimated, real_source, interference, noise)?;
        debug!(
            "aligned {} samples, {} interference signal(s), noise: {}",
            signals.len(),
            signals.interference_count(),
            signals.has_noise()
        );
        Ok(Self {
            signals,
            options,
            s_target: OnceCell::new(),
            e_interf: OnceCell::new(),
            e_noise: OnceCell::new(),
            e_artif: OnceCell::new(),
            sdr: OnceCell::new(),
            sir: OnceCell::new(),
            snr: OnceCell::new(),
            sar: OnceCell::new(),
        })
    }

    /// Number of samples M every signal was truncated to.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn interference_count(&self) -> usize {
        self.signals.interference_count()
    }

    pub fn has_noise(&self) -> bool {
        self.signals.has_noise()
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn signals(&self) -> &AlignedSignals {
        &self.signals
    }

    // -- Decomposition components --

    /// `P_s ŝ`: the part of the estimate explained by the true source alone.
    pub fn target(&self) -> Result<&[f64], EvalError> {
        cached(&self.s_target, || {
            let basis = self.signals.target_basis();
            let target = project(&self.signals.estimated, &basis, &self.options)?;
            debug!("computed s_target, energy {:.6e}", energy(&target));
            Ok(target)
        })
    }

    /// `P_{s,i} ŝ - s_target`: what the interference subspace adds.
    ///
    /// Zero when there are no interference signals.
    pub fn interference_error(&self) -> Result<&[f64], EvalError> {
        cached(&self.e_interf, || {
            let target = self.target()?;
            let basis = self.signals.interference_basis();
            let projected = project(&self.signals.estimated, &basis, &self.options)?;
            let e_interf = sub(&projected, target);
            debug!("computed e_interf, energy {:.6e}", energy(&e_interf));
            Ok(e_interf)
        })
    }

    /// `P_{s,i,n} ŝ - (e_interf + s_target)`: what the noise adds.
    ///
    /// Zero when no noise signal was given.
    pub fn noise_error(&self) -> Result<&[f64], EvalError> {
        cached(&self.e_noise, || {
            let explained = add(self.interference_error()?, self.target()?);
            let basis = self.signals.noise_basis();
            let projected = project(&self.signals.estimated, &basis, &self.options)?;
            let e_noise = sub(&projected, &explained);
            debug!("computed e_noise, energy {:.6e}", energy(&e_noise));
            Ok(e_noise)
        })
    }

    /// `ŝ - (e_noise + e_interf + s_target)`: everything left unexplained.
    pub fn artifact_error(&self) -> Result<&[f64], EvalError> {
        cached(&self.e_artif, || {
            let explained = add(
                &add(self.noise_error()?, self.interference_error()?),
                self.target()?,
            );
            let e_artif = sub(&self.signals.estimated, &explained);
            debug!("computed e_artif, energy {:.6e}", energy(&e_artif));
            Ok(e_artif)
        })
    }

    pub fn energies(&self) -> Result<ComponentEnergies, EvalError> {
        Ok(ComponentEnergies {
            target: energy(self.target()?),
            interference: energy(self.interference_error()?),
            noise: energy(self.noise_error()?),
            artifacts: energy(self.artifact_error()?),
        })
    }

    // -- Ratios (dB) --

    /// Source-to-Distortion ratio:
    /// `‖s_target‖² / ‖e_interf + e_noise + e_artif‖²`.
    pub fn sdr(&self) -> Result<f64, EvalError> {
        cached_metric(&self.sdr, || {
            let distortion = add(
                &add(self.interference_error()?, self.noise_error()?),
                self.artifact_error()?,
            );
            self.ratio_db(Metric::Sdr, energy(self.target()?), energy(&distortion))
        })
    }

    /// Source-to-Interference ratio: `‖s_target‖² / ‖e_interf‖²`.
    pub fn sir(&self) -> Result<f64, EvalError> {
        cached_metric(&self.sir, || {
            self.ratio_db(
                Metric::Sir,
                energy(self.target()?),
                energy(self.interference_error()?),
            )
        })
    }

    /// Source-to-Noise ratio: `‖s_target + e_interf‖² / ‖e_noise‖²`.
    pub fn snr(&self) -> Result<f64, EvalError> {
        cached_metric(&self.snr, || {
            let signal = add(self.target()?, self.interference_error()?);
            self.ratio_db(Metric::Snr, energy(&signal), energy(self.noise_error()?))
        })
    }

    /// Source-to-Artifacts ratio:
    /// `‖s_target + e_interf + e_noise‖² / ‖e_artif‖²`.
    pub fn sar(&self) -> Result<f64, EvalError> {
        cached_metric(&self.sar, || {
            let signal = add(
                &add(self.target()?, self.interference_error()?),
                self.noise_error()?,
            );
            self.ratio_db(Metric::Sar, energy(&signal), energy(self.artifact_error()?))
        })
    }

    /// Value of `metric`, dispatching to the matching accessor.
    pub fn metric(&self, metric: Metric) -> Result<f64, EvalError> {
        match metric {
            Metric::Sdr => self.sdr(),
            Metric::Sir => self.sir(),
            Metric::Snr => self.snr(),
            Metric::Sar => self.sar(),
        }
    }

    /// Summarise components and ratios.
    ///
    /// Undefined ratios become [`MetricValue::Undefined`](crate::MetricValue::Undefined)
    /// instead of failing the whole report; projection errors still propagate.
    pub fn report(&self) -> Result<EvaluationReport, EvalError> {
        EvaluationReport::from_evaluation(self)
    }

    fn ratio_db(
        &self,
        metric: Metric,
        numerator: f64,
        denominator: f64,
    ) -> Result<f64, EvalError> {
        let floor = self.options.zero_energy_tolerance * energy(&self.signals.estimated);
        let num_zero = numerator <= floor;
        let den_zero = denominator <= floor;

        match (num_zero, den_zero, self.options.zero_energy_policy) {
            (_, true, ZeroEnergyPolicy::Error) | (true, true, ZeroEnergyPolicy::Infinity) => {
                Err(EvalError::UndefinedMetric { metric })
            }
            (false, true, ZeroEnergyPolicy::Infinity) => Ok(f64::INFINITY),
            (true, false, _) => Ok(f64::NEG_INFINITY),
            (false, false, _) => Ok(10.0 * (numerator / denominator).log10()),
        }
    }
}

/// Return the cached value, computing it first if needed. Errors leave the
/// cell empty so a later call can retry.
fn cached<'a, F>(cell: &'a OnceCell<Vec<f64>>, compute: F) -> Result<&'a [f64], EvalError>
where
    F: FnOnce() -> Result<Vec<f64>, EvalError>,
{
    if let Some(v) = cell.get() {
        return Ok(v.as_slice());
    }
    let v = compute()?;
    Ok(cell.get_or_init(|| v).as_slice())
}

fn cached_metric<F>(cell: &OnceCell<f64>, compute: F) -> Result<f64, EvalError>
where
    F: FnOnce() -> Result<f64, EvalError>,
{
    if let Some(v) = cell.get() {
        return Ok(*v);
    }
    let v = compute()?;
    Ok(*cell.get_or_init(|| v))
}
