use anyhow::{bail, Context};
use avscore::prelude::SimulationSettings;
use avscore::processing::{FusionMethod, GridConfig};
use avscore::{Position, ScenarioParameters, SeaState};
use clap::{Parser, ValueEnum};
use log::info;
use report::{write_json, RunSummary};
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod report;
mod workflow;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FusionArg {
    LeastSquares,
    GridSearch,
}

#[derive(Parser)]
#[command(author, version, about = "Acoustic vector sensor localization simulator")]
struct Args {
    /// Load scenario and settings from YAML instead of the flags below
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Target strength, dB re 1 uPa
    #[arg(long, default_value_t = 150.0)]
    target_strength: f64,
    #[arg(long, default_value_t = 1000.0)]
    sampling_rate: f64,
    /// Sea state code: 0, 1, 3 or 6
    #[arg(long, default_value_t = 0)]
    sea_state: u8,
    /// Signal duration, seconds
    #[arg(long, default_value_t = 1.0)]
    duration: f64,
    /// Carrier frequency radiated by the target, Hz
    #[arg(long, default_value_t = 100.0)]
    frequency: f64,
    /// Sensor position as `x,y` in metres; repeat for each sensor
    #[arg(long = "sensor", value_parser = parse_point, allow_hyphen_values = true)]
    sensors: Vec<Position>,
    /// Target position as `x,y` in metres
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true, default_value = "800,0")]
    target: Position,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = FusionArg::LeastSquares)]
    fusion: FusionArg,
    /// Run the scenario once per sea state
    #[arg(long, default_value_t = false)]
    sweep: bool,
    /// Write the full result bundle(s) as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_point(raw: &str) -> Result<Position, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{}`", raw))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in `{}`: {}", raw, e))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in `{}`: {}", raw, e))?;
    Ok(Position::new(x, y))
}

impl Args {
    fn into_config(self) -> anyhow::Result<WorkflowConfig> {
        let sea_state = SeaState::try_from(self.sea_state).context("parsing --sea-state")?;
        let sensors = if self.sensors.is_empty() {
            ScenarioParameters::default().sensors
        } else {
            self.sensors
        };
        let scenario = ScenarioParameters {
            target_strength_db: self.target_strength,
            sampling_rate_hz: self.sampling_rate,
            sea_state,
            duration_s: self.duration,
            frequency_hz: self.frequency,
            sensors,
            target: self.target,
            seed: self.seed,
        };
        let fusion = match self.fusion {
            FusionArg::LeastSquares => FusionMethod::LeastSquares,
            FusionArg::GridSearch => FusionMethod::GridSearch(GridConfig::default()),
        };
        let settings = SimulationSettings {
            fusion,
            ..Default::default()
        };
        Ok(WorkflowConfig::from_args(scenario, settings))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let sweep = args.sweep;
    let output = args.output.clone();

    let workflow_config = if let Some(path) = args.scenario.clone() {
        WorkflowConfig::load(path)?
    } else {
        args.into_config()?
    };

    let runner = Runner::new(workflow_config);
    info!(
        "running {} sensor scenario, fusion {:?}",
        runner.config().scenario.sensors.len(),
        runner.config().settings.fusion
    );

    if sweep {
        let records = runner.sweep()?;
        for record in &records {
            match (&record.report, &record.error) {
                (Some(report), _) => println!("{}", RunSummary::from(report)),
                (None, Some(err)) => println!("sea state {}: failed: {}", record.sea_state, err),
                (None, None) => println!("sea state {}: no result", record.sea_state),
            }
        }
        if let Some(path) = output {
            write_json(path, &records)?;
        }
    } else {
        let report = runner.execute()?;
        println!("{}", RunSummary::from(&report));
        if let Some(path) = output {
            write_json(path, &report)?;
        }
    }

    let metrics = runner.metrics();
    info!(
        "runs completed {}, failed {} {:?}",
        metrics.completed, metrics.failed, metrics.failures_by_kind
    );
    if metrics.completed == 0 {
        bail!("no simulation run completed");
    }
    Ok(())
}
