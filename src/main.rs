use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use beam_eval::synth::{Scenario, ScenarioConfig};
use beam_eval::{BeamformingEvaluation, EvaluationOptions};

/// Evaluate a synthetic beamformer run and print the report as JSON.
///
/// Usage: `beam-eval [options.json]`
///
/// The optional JSON file holds [`EvaluationOptions`] fields and may carry a
/// `"scenario"` object with [`ScenarioConfig`] fields.
fn main() -> Result<()> {
    env_logger::init();

    let (options, scenario_config) = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => (EvaluationOptions::default(), ScenarioConfig::default()),
    };

    let scenario = Scenario::generate(&scenario_config);
    info!(
        "generated scenario: {} samples, {} interferer(s), seed {}",
        scenario_config.samples,
        scenario.interference.len(),
        scenario_config.seed
    );

    let evaluation = BeamformingEvaluation::with_options(
        &scenario.estimated,
        &scenario.real_source,
        &scenario.interference,
        Some(scenario.noise.as_slice()),
        options,
    )
    .context("building evaluation")?;

    let report = evaluation.report().context("evaluating scenario")?;
    info!("{report}");

    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    println!("{json}");
    Ok(())
}

fn load_config(path: &Path) -> Result<(EvaluationOptions, ScenarioConfig)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let options = EvaluationOptions::from_json(&text)
        .with_context(|| format!("parsing options in {}", path.display()))?;

    let root: serde_json::Value = serde_json::from_str(&text).context("parsing JSON")?;
    let scenario = match root.get("scenario") {
        Some(v) => serde_json::from_value(v.clone()).context("parsing \"scenario\"")?,
        None => ScenarioConfig::default(),
    };
    Ok((options, scenario))
}
