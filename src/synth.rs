use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Deterministic PRNG
// ---------------------------------------------------------------------------

/// xoshiro256** stream seeded per scenario, so runs are reproducible.
#[derive(Debug, Clone)]
pub(crate) struct ScenarioRng {
    state: [u64; 4],
}

impl ScenarioRng {
    pub(crate) fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        ScenarioRng { state: s }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub(crate) fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    pub(crate) fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Scenario – a synthetic beamforming test case
// ---------------------------------------------------------------------------

/// Parameters of a synthetic beamformer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub samples: usize,
    pub sample_rate: f64,
    /// Frequencies (Hz) of the interfering tones, one signal each.
    pub interferer_freqs: Vec<f64>,
    /// Standard deviation of the sensor noise.
    pub noise_std: f64,
    /// Fraction of each interferer that leaks through the beamformer.
    pub interference_leak: f64,
    /// Fraction of the noise that leaks through the beamformer.
    pub noise_leak: f64,
    /// Strength of the quadratic distortion added by the beamformer.
    pub distortion: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            samples: 4096,
            sample_rate: 16_000.0,
            interferer_freqs: vec![1_250.0, 2_700.0],
            noise_std: 0.1,
            interference_leak: 0.1,
            noise_leak: 0.3,
            distortion: 0.02,
        }
    }
}

/// Signals of one synthetic run, ready to feed into an evaluation.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub real_source: Vec<f64>,
    pub interference: Vec<Vec<f64>>,
    pub noise: Vec<f64>,
    pub estimated: Vec<f64>,
}

impl Scenario {
    /// Build a scenario: a harmonic target (440 Hz fundamental plus two
    /// overtones), one tone per interferer, Gaussian noise, and an estimate
    /// that keeps the target, leaks part of the interference and noise, and
    /// adds a small quadratic distortion.
    pub fn generate(config: &ScenarioConfig) -> Self {
        let mut rng = ScenarioRng::new(config.seed);
        let n = config.samples;
        let t = |i: usize| i as f64 / config.sample_rate;

        let real_source: Vec<f64> = (0..n)
            .map(|i| {
                let x = t(i);
                (2.0 * PI * 440.0 * x).sin()
                    + 0.5 * (2.0 * PI * 880.0 * x).sin()
                    + 0.25 * (2.0 * PI * 1_320.0 * x).sin()
            })
            .collect();

        let interference: Vec<Vec<f64>> = config
            .interferer_freqs
            .iter()
            .map(|&freq| {
                let phase = 2.0 * PI * rng.next_f64();
                (0..n)
                    .map(|i| 0.8 * (2.0 * PI * freq * t(i) + phase).sin())
                    .collect()
            })
            .collect();

        let noise: Vec<f64> = (0..n).map(|_| rng.gauss(0.0, config.noise_std)).collect();

        let estimated: Vec<f64> = (0..n)
            .map(|i| {
                let s = real_source[i];
                let leaked: f64 = interference.iter().map(|col| col[i]).sum::<f64>()
                    * config.interference_leak;
                s + leaked + config.noise_leak * noise[i] + config.distortion * s * s
            })
            .collect();

        Scenario {
            real_source,
            interference,
            noise,
            estimated,
        }
    }
}
