use serde::{Deserialize, Serialize};

use crate::interface::scenario::ScenarioParameters;
use crate::math::fft::{amplitude_spectrum, AmplitudeSpectrum};
use crate::prelude::{AvsError, AvsResult, Position};
use crate::processing::doa::DoaEstimate;
use crate::processing::response::SensorObservation;
use crate::processing::synth::TransmittedSignal;

/// Everything one sensor saw and estimated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    pub position: Position,
    pub range_m: f64,
    pub true_bearing_deg: f64,
    /// Pressure-channel noise realization.
    pub noise: Vec<f64>,
    #[serde(flatten)]
    pub observation: SensorObservation,
    pub doa: DoaEstimate,
    /// Absolute wrapped difference between estimated and true bearing, degrees.
    pub doa_error_deg: f64,
}

/// Fused target fix and its distance from the true target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEstimate {
    pub x: f64,
    pub y: f64,
    pub range_error_m: f64,
    pub method: String,
}

/// Immutable result bundle of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: ScenarioParameters,
    pub signal: TransmittedSignal,
    pub sensors: Vec<SensorReport>,
    pub position: PositionEstimate,
}

/// Series of the bundle that can be transformed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Transmitted,
    Noise(usize),
    Pressure(usize),
    VelocityX(usize),
    VelocityY(usize),
}

impl SimulationReport {
    pub fn series(&self, channel: Channel) -> AvsResult<&[f64]> {
        let sensor = move |idx: usize| {
            self.sensors.get(idx).ok_or_else(|| {
                AvsError::InvalidParameter(format!(
                    "sensor {} out of range ({} sensors)",
                    idx,
                    self.sensors.len()
                ))
            })
        };
        let series: &[f64] = match channel {
            Channel::Transmitted => &self.signal.amplitude,
            Channel::Noise(idx) => &sensor(idx)?.noise,
            Channel::Pressure(idx) => &sensor(idx)?.observation.pressure,
            Channel::VelocityX(idx) => &sensor(idx)?.observation.velocity_x,
            Channel::VelocityY(idx) => &sensor(idx)?.observation.velocity_y,
        };
        Ok(series)
    }

    /// One-sided amplitude spectrum of `channel`.
    pub fn spectrum(&self, channel: Channel) -> AvsResult<AmplitudeSpectrum> {
        amplitude_spectrum(self.series(channel)?, self.signal.sampling_rate_hz)
    }

    pub fn estimated_bearings(&self) -> Vec<f64> {
        self.sensors.iter().map(|s| s.doa.bearing_deg).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::simulate;
    use crate::prelude::SimulationSettings;

    #[test]
    fn bundle_serializes_with_fixed_field_names() {
        let scenario = ScenarioParameters::default().with_seed(1);
        let report = simulate(&scenario, &SimulationSettings::default()).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["scenario"]["sea_state"], "calm");
        assert_eq!(value["signal"]["amplitude"].as_array().unwrap().len(), 1000);
        let sensor = &value["sensors"][0];
        for key in [
            "position",
            "range_m",
            "true_bearing_deg",
            "noise",
            "pressure",
            "velocity_x",
            "velocity_y",
            "snr_db",
            "rnl_db",
            "transmission_loss_db",
            "doa",
            "doa_error_deg",
        ] {
            assert!(sensor.get(key).is_some(), "missing {}", key);
        }
        assert!(value["position"]["range_error_m"].is_number());
    }

    #[test]
    fn estimated_bearings_are_co_indexed() {
        let report = simulate(
            &ScenarioParameters::default().with_seed(2),
            &SimulationSettings::default(),
        )
        .unwrap();
        let bearings = report.estimated_bearings();
        assert_eq!(bearings.len(), report.scenario.sensors.len());
        assert_eq!(bearings[1], report.sensors[1].doa.bearing_deg);
    }
}
