use avscore::SimulationReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-sensor figures shown by the DOA and target analysis view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSummary {
    pub label: String,
    pub range_m: f64,
    pub rnl_db: f64,
    pub snr_db: f64,
    pub true_bearing_deg: f64,
    pub estimated_bearing_deg: f64,
    pub doa_error_deg: f64,
    pub degenerate: bool,
}

/// Scalar view of a run, without the sample series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub sea_state: String,
    pub sensors: Vec<SensorSummary>,
    pub target: (f64, f64),
    pub estimate: (f64, f64),
    pub range_error_m: f64,
    pub method: String,
}

impl From<&SimulationReport> for RunSummary {
    fn from(report: &SimulationReport) -> Self {
        let sensors = report
            .sensors
            .iter()
            .enumerate()
            .map(|(idx, sensor)| SensorSummary {
                label: format!("AVS-{}", idx + 1),
                range_m: sensor.range_m,
                rnl_db: sensor.observation.rnl_db,
                snr_db: sensor.observation.snr_db,
                true_bearing_deg: sensor.true_bearing_deg,
                estimated_bearing_deg: sensor.doa.bearing_deg,
                doa_error_deg: sensor.doa_error_deg,
                degenerate: sensor.doa.degenerate,
            })
            .collect();

        Self {
            sea_state: report.scenario.sea_state.to_string(),
            sensors,
            target: (report.scenario.target.x, report.scenario.target.y),
            estimate: (report.position.x, report.position.y),
            range_error_m: report.position.range_error_m,
            method: report.position.method.clone(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sea state {}", self.sea_state)?;
        for sensor in &self.sensors {
            writeln!(
                f,
                "  {}: range {:.2} m, RNL {:.2} dB, SNR {:.2} dB, DOA true {:.2} deg est {:.2} deg err {:.5} deg{}",
                sensor.label,
                sensor.range_m,
                sensor.rnl_db,
                sensor.snr_db,
                sensor.true_bearing_deg,
                sensor.estimated_bearing_deg,
                sensor.doa_error_deg,
                if sensor.degenerate { " (degenerate)" } else { "" }
            )?;
        }
        write!(
            f,
            "  target ({:.2}, {:.2}) -> estimate ({:.2}, {:.2}) via {}, range error {:.5} m",
            self.target.0,
            self.target.1,
            self.estimate.0,
            self.estimate.1,
            self.method,
            self.range_error_m
        )
    }
}
