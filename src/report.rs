use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{EvalError, Metric};
use crate::evaluation::{BeamformingEvaluation, ComponentEnergies};

// ---------------------------------------------------------------------------
// MetricValue – a ratio that may be infinite or undefined
// ---------------------------------------------------------------------------

/// A decibel ratio as it appears in a report.
///
/// JSON has no infinities, so they serialize as the strings `"inf"` and
/// `"-inf"`; an undefined ratio serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Finite(f64),
    PosInfinity,
    NegInfinity,
    Undefined,
}

impl MetricValue {
    fn from_result(result: Result<f64, EvalError>) -> Result<Self, EvalError> {
        match result {
            Ok(v) if v == f64::INFINITY => Ok(MetricValue::PosInfinity),
            Ok(v) if v == f64::NEG_INFINITY => Ok(MetricValue::NegInfinity),
            Ok(v) => Ok(MetricValue::Finite(v)),
            Err(EvalError::UndefinedMetric { .. }) => Ok(MetricValue::Undefined),
            Err(e) => Err(e),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Finite(v) => Some(*v),
            MetricValue::PosInfinity => Some(f64::INFINITY),
            MetricValue::NegInfinity => Some(f64::NEG_INFINITY),
            MetricValue::Undefined => None,
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Finite(v) => serializer.serialize_f64(*v),
            MetricValue::PosInfinity => serializer.serialize_str("inf"),
            MetricValue::NegInfinity => serializer.serialize_str("-inf"),
            MetricValue::Undefined => serializer.serialize_none(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Finite(v) => write!(f, "{v:.2} dB"),
            MetricValue::PosInfinity => write!(f, "+inf dB"),
            MetricValue::NegInfinity => write!(f, "-inf dB"),
            MetricValue::Undefined => write!(f, "undefined"),
        }
    }
}

// ---------------------------------------------------------------------------
// EvaluationReport
// ---------------------------------------------------------------------------

/// Snapshot of an evaluation, ready to print or serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub samples: usize,
    pub interference_count: usize,
    pub has_noise: bool,
    pub energies: ComponentEnergies,
    pub sdr: MetricValue,
    pub sir: MetricValue,
    pub snr: MetricValue,
    pub sar: MetricValue,
}

impl EvaluationReport {
    pub fn from_evaluation(ev: &BeamformingEvaluation) -> Result<Self, EvalError> {
        Ok(EvaluationReport {
            samples: ev.len(),
            interference_count: ev.interference_count(),
            has_noise: ev.has_noise(),
            energies: ev.energies()?,
            sdr: MetricValue::from_result(ev.sdr())?,
            sir: MetricValue::from_result(ev.sir())?,
            snr: MetricValue::from_result(ev.snr())?,
            sar: MetricValue::from_result(ev.sar())?,
        })
    }

    pub fn metric(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::Sdr => self.sdr,
            Metric::Sir => self.sir,
            Metric::Snr => self.snr,
            Metric::Sar => self.sar,
        }
    }

    /// All four ratios keyed by metric, e.g. `{"SDR": 12.5, "SIR": "inf", ...}`
    /// once serialized.
    pub fn metrics(&self) -> BTreeMap<Metric, MetricValue> {
        Metric::ALL.iter().map(|&m| (m, self.metric(m))).collect()
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples, {} interferer(s), noise: {}",
            self.samples,
            self.interference_count,
            if self.has_noise { "yes" } else { "no" },
        )?;
        for metric in Metric::ALL {
            write!(f, " | {metric} {}", self.metric(metric))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinities_serialize_as_strings() {
        let json = serde_json::to_string(&[
            MetricValue::Finite(3.5),
            MetricValue::PosInfinity,
            MetricValue::NegInfinity,
            MetricValue::Undefined,
        ])
        .unwrap();
        assert_eq!(json, r#"[3.5,"inf","-inf",null]"#);
    }

    #[test]
    fn undefined_metric_does_not_fail_report() {
        let s = [1.0, 0.0, 0.0, 0.0];
        let est = [0.0, 1.0, 0.0, 0.0];
        let ev = BeamformingEvaluation::new(&est, &s, &[], None).unwrap();
        let report = ev.report().unwrap();

        assert_eq!(report.sir, MetricValue::Undefined);
        assert_eq!(report.sir.as_f64(), None);
        assert_eq!(report.sdr.as_f64(), Some(f64::NEG_INFINITY));
        assert_eq!(report.sdr, MetricValue::NegInfinity);
        assert_eq!(report.metric(Metric::Sar), MetricValue::NegInfinity);
        assert_eq!(report.samples, 4);
        assert!(!report.has_noise);
    }

    #[test]
    fn report_json_shape() {
        let s = [1.0, 2.0, -1.0, 0.5];
        let ev = BeamformingEvaluation::new(&s, &s, &[], None).unwrap();
        let value = serde_json::to_value(ev.report().unwrap()).unwrap();

        assert_eq!(value["samples"], 4);
        assert_eq!(value["interference_count"], 0);
        assert_eq!(value["sdr"], "inf");
        assert!(value["energies"]["target"].as_f64().unwrap() > 6.0);
    }

    #[test]
    fn metrics_map_is_keyed_by_metric_name() {
        let s = [1.0, 0.0, 0.0, 0.0];
        let est = [1.0, 0.5, 0.0, 0.0];
        let i1 = [0.0, 1.0, 0.0, 0.0];
        let ev = BeamformingEvaluation::new(&est, &s, &[i1.to_vec()], None).unwrap();
        let report = ev.report().unwrap();

        let metrics = report.metrics();
        assert_eq!(metrics.keys().copied().collect::<Vec<_>>(), Metric::ALL.to_vec());
        assert_eq!(metrics[&Metric::Snr], MetricValue::PosInfinity);

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["SNR"], "inf");
        assert_eq!(json["SAR"], "inf");
        // ‖s‖² / ‖0.5 i‖² = 4
        let sir = json["SIR"].as_f64().unwrap();
        assert!((sir - 10.0 * 4.0f64.log10()).abs() < 1e-9, "{sir}");
    }

    #[test]
    fn display_is_one_line() {
        let report = EvaluationReport {
            samples: 10,
            interference_count: 2,
            has_noise: true,
            energies: ComponentEnergies {
                target: 1.0,
                interference: 0.1,
                noise: 0.01,
                artifacts: 0.001,
            },
            sdr: MetricValue::Finite(9.5),
            sir: MetricValue::Finite(10.0),
            snr: MetricValue::PosInfinity,
            sar: MetricValue::Undefined,
        };
        let text = report.to_string();
        assert!(!text.contains('\n'));
        assert!(text.contains("SDR 9.50 dB"));
        assert!(text.contains("SNR +inf dB"));
        assert!(text.contains("SAR undefined"));
    }
}
