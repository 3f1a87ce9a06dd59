use anyhow::Context;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let file = File::create(path_ref)
        .with_context(|| format!("creating report file {}", path_ref.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("writing report {}", path_ref.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::summary::RunSummary;
    use avscore::prelude::SimulationSettings;
    use avscore::{simulate, ScenarioParameters};

    #[test]
    fn report_round_trips_through_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("report.json");
        let report = simulate(
            &ScenarioParameters::default().with_seed(12),
            &SimulationSettings::default(),
        )
        .unwrap();

        write_json(&path, &RunSummary::from(&report)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let parsed: RunSummary = serde_json::from_str(&contents).unwrap();
        let expected = RunSummary::from(&report);
        assert_eq!(parsed.sea_state, expected.sea_state);
        assert_eq!(parsed.method, expected.method);
        assert_eq!(parsed.sensors.len(), expected.sensors.len());
        assert!((parsed.range_error_m - expected.range_error_m).abs() <= 1e-9 * expected.range_error_m.max(1.0));
    }
}
