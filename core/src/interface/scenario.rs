use serde::{Deserialize, Serialize};

use crate::prelude::{AvsError, AvsResult, Position};
use crate::processing::noise::SeaState;

/// Inputs of one simulation run, in metres, hertz, seconds and dB re 1 uPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    pub target_strength_db: f64,
    pub sampling_rate_hz: f64,
    pub sea_state: SeaState,
    pub duration_s: f64,
    pub frequency_hz: f64,
    pub sensors: Vec<Position>,
    pub target: Position,
    /// Fixed seed for reproducible noise; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            target_strength_db: 150.0,
            sampling_rate_hz: 1000.0,
            sea_state: SeaState::Calm,
            duration_s: 1.0,
            frequency_hz: 100.0,
            sensors: vec![Position::new(0.0, 20.0), Position::new(0.0, 40.0)],
            target: Position::new(800.0, 0.0),
            seed: None,
        }
    }
}

impl ScenarioParameters {
    /// Builds a scenario from the control panel's scalar inputs.
    #[allow(clippy::too_many_arguments)]
    pub fn two_sensor(
        target_strength_db: f64,
        sampling_rate_hz: f64,
        sea_state_code: u8,
        duration_s: f64,
        frequency_hz: f64,
        avs1: (f64, f64),
        avs2: (f64, f64),
        target: (f64, f64),
    ) -> AvsResult<Self> {
        Ok(Self {
            target_strength_db,
            sampling_rate_hz,
            sea_state: SeaState::try_from(sea_state_code)?,
            duration_s,
            frequency_hz,
            sensors: vec![Position::new(avs1.0, avs1.1), Position::new(avs2.0, avs2.1)],
            target: Position::new(target.0, target.1),
            seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sea_state(mut self, sea_state: SeaState) -> Self {
        self.sea_state = sea_state;
        self
    }

    /// Rejects arrays that can never be fused before any work is done.
    pub fn validate(&self) -> AvsResult<()> {
        if self.sensors.len() < 2 {
            return Err(AvsError::InsufficientGeometry(format!(
                "need at least two sensors, got {}",
                self.sensors.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sensor_maps_panel_inputs() {
        let scenario =
            ScenarioParameters::two_sensor(150.0, 1000.0, 3, 1.0, 100.0, (0.0, 20.0), (0.0, 40.0), (800.0, 0.0))
                .unwrap();
        assert_eq!(scenario.sea_state, SeaState::Moderate);
        assert_eq!(scenario.sensors.len(), 2);
        assert_eq!(scenario.target, Position::new(800.0, 0.0));
    }

    #[test]
    fn two_sensor_rejects_unknown_sea_state() {
        let err =
            ScenarioParameters::two_sensor(150.0, 1000.0, 2, 1.0, 100.0, (0.0, 20.0), (0.0, 40.0), (800.0, 0.0))
                .unwrap_err();
        assert!(matches!(err, AvsError::InvalidParameter(_)));
    }

    #[test]
    fn single_sensor_scenario_fails_validation() {
        let scenario = ScenarioParameters {
            sensors: vec![Position::new(0.0, 0.0)],
            ..Default::default()
        };
        assert!(matches!(
            scenario.validate(),
            Err(AvsError::InsufficientGeometry(_))
        ));
    }
}
