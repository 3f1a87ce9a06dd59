use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use avscore::telemetry::{MetricsRecorder, MetricsSnapshot};
use avscore::{simulate, AvsError, SeaState, SimulationReport};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;

/// Outcome of one sea state in a sweep; a failed run carries no report.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRecord {
    pub sea_state: SeaState,
    pub report: Option<SimulationReport>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn record(&self, result: &Result<SimulationReport, AvsError>) {
        match result {
            Ok(_) => self.metrics.record_completed(),
            Err(err) => self.metrics.record_failure(err),
        }
    }

    pub fn execute(&self) -> anyhow::Result<SimulationReport> {
        let result = simulate(&self.config.scenario, &self.config.settings);
        self.record(&result);
        result.context("executing simulation")
    }

    /// Runs the scenario once per sea state, in parallel, returning records in severity order.
    pub fn sweep(&self) -> anyhow::Result<Vec<SweepRecord>> {
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for sea-state sweep")?;

        let handles: Vec<_> = SeaState::ALL
            .iter()
            .map(|&sea_state| {
                let scenario = self.config.scenario.clone().with_sea_state(sea_state);
                let settings = self.config.settings.clone();
                let handle = runtime.spawn_blocking(move || simulate(&scenario, &settings));
                (sea_state, handle)
            })
            .collect();

        runtime.block_on(async {
            let mut records = Vec::with_capacity(handles.len());
            for (sea_state, handle) in handles {
                let result = handle
                    .await
                    .with_context(|| format!("joining sweep run for sea state {}", sea_state))?;
                self.record(&result);
                let record = match result {
                    Ok(report) => {
                        info!(
                            "sea state {} -> range error {:.3} m",
                            sea_state, report.position.range_error_m
                        );
                        SweepRecord {
                            sea_state,
                            report: Some(report),
                            error: None,
                        }
                    }
                    Err(err) => {
                        warn!("sea state {} failed: {}", sea_state, err);
                        SweepRecord {
                            sea_state,
                            report: None,
                            error: Some(err.to_string()),
                        }
                    }
                };
                records.push(record);
            }
            Ok::<_, anyhow::Error>(records)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avscore::prelude::SimulationSettings;
    use avscore::ScenarioParameters;

    fn config(scenario: ScenarioParameters) -> WorkflowConfig {
        WorkflowConfig::from_args(scenario, SimulationSettings::default())
    }

    #[test]
    fn runner_executes_workflow() {
        let runner = Runner::new(config(ScenarioParameters::default().with_seed(4)));
        let report = runner.execute().unwrap();
        assert_eq!(report.signal.amplitude.len(), 1000);
        assert_eq!(runner.metrics().completed, 1);
    }

    #[test]
    fn runner_reports_nyquist_failure() {
        let scenario = ScenarioParameters {
            frequency_hz: 1500.0,
            ..Default::default()
        };
        let runner = Runner::new(config(scenario));
        let err = runner.execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AvsError>(),
            Some(AvsError::InvalidParameter(_))
        ));
        assert_eq!(runner.metrics().failures_by_kind["invalid_parameter"], 1);
    }

    #[test]
    fn sweep_returns_records_in_severity_order() {
        let runner = Runner::new(config(ScenarioParameters::default().with_seed(8)));
        let records = runner.sweep().unwrap();

        let states: Vec<SeaState> = records.iter().map(|r| r.sea_state).collect();
        assert_eq!(states, SeaState::ALL.to_vec());

        let levels: Vec<f64> = records
            .iter()
            .map(|r| r.report.as_ref().unwrap().sensors[0].observation.rnl_db)
            .collect();
        assert!(levels.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(runner.metrics().completed, 4);
    }
}
