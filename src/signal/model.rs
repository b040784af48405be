use crate::error::EvalError;

// ---------------------------------------------------------------------------
// Vector helpers
// ---------------------------------------------------------------------------

/// Sum of squares.
pub fn energy(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

/// Element-wise `a + b`. Both slices must have the same length.
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// Element-wise `a - b`. Both slices must have the same length.
pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

// ---------------------------------------------------------------------------
// AlignedSignals – inputs cut to a common length
// ---------------------------------------------------------------------------

/// Owned copies of every input signal, truncated to `len(estimated)` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSignals {
    /// Beamformer output (ŝ).
    pub estimated: Vec<f64>,
    /// Clean reference (s).
    pub real_source: Vec<f64>,
    /// One entry per interfering signal (basis columns).
    pub interference: Vec<Vec<f64>>,
    pub noise: Option<Vec<f64>>,
}

impl AlignedSignals {
    /// Truncate every signal to the estimate's length.
    ///
    /// Fails with [`EvalError::Dimension`] when a signal is shorter than the
    /// estimate, [`EvalError::NonFinite`] on NaN/inf samples inside the kept
    /// window, and [`EvalError::EmptySignal`] when the estimate is empty.
    pub fn align(
        estimated: &[f64],
        real_source: &[f64],
        interference: &[Vec<f64>],
        noise: Option<&[f64]>,
    ) -> Result<Self, EvalError> {
        let m = estimated.len();
        if m == 0 {
            return Err(EvalError::EmptySignal);
        }

        let estimated = truncate(estimated, "estimated", m)?;
        let real_source = truncate(real_source, "real_source", m)?;
        let interference = interference
            .iter()
            .enumerate()
            .map(|(i, col)| truncate(col, &format!("interference[{i}]"), m))
            .collect::<Result<Vec<_>, _>>()?;
        let noise = noise.map(|n| truncate(n, "noise", m)).transpose()?;

        Ok(AlignedSignals {
            estimated,
            real_source,
            interference,
            noise,
        })
    }

    /// Common length M of every aligned signal.
    pub fn len(&self) -> usize {
        self.estimated.len()
    }

    /// Always false for a successfully aligned set.
    pub fn is_empty(&self) -> bool {
        self.estimated.is_empty()
    }

    pub fn interference_count(&self) -> usize {
        self.interference.len()
    }

    pub fn has_noise(&self) -> bool {
        self.noise.is_some()
    }

    /// Basis `[s]`.
    pub fn target_basis(&self) -> Vec<&[f64]> {
        vec![self.real_source.as_slice()]
    }

    /// Basis `[s, interference...]`.
    pub fn interference_basis(&self) -> Vec<&[f64]> {
        let mut basis = self.target_basis();
        basis.extend(self.interference.iter().map(Vec::as_slice));
        basis
    }

    /// Basis `[s, interference..., noise]` (noise only when present).
    pub fn noise_basis(&self) -> Vec<&[f64]> {
        let mut basis = self.interference_basis();
        if let Some(noise) = &self.noise {
            basis.push(noise.as_slice());
        }
        basis
    }
}

fn truncate(signal: &[f64], name: &str, m: usize) -> Result<Vec<f64>, EvalError> {
    if signal.len() < m {
        return Err(EvalError::Dimension {
            signal: name.to_string(),
            expected: m,
            actual: signal.len(),
        });
    }
    let kept = &signal[..m];
    if let Some(index) = kept.iter().position(|v| !v.is_finite()) {
        return Err(EvalError::NonFinite {
            signal: name.to_string(),
            index,
        });
    }
    Ok(kept.to_vec())
}
