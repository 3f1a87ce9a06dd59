use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;
use crate::prelude::{AvsError, AvsResult};
use crate::processing::geometry::SensorGeometry;
use crate::processing::noise::SensorNoise;
use crate::processing::synth::TransmittedSignal;
use crate::telemetry::log::LogManager;

/// Pressure and particle-velocity channels received by one vector sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorObservation {
    pub pressure: Vec<f64>,
    pub velocity_x: Vec<f64>,
    pub velocity_y: Vec<f64>,
    pub transmission_loss_db: f64,
    pub received_level_db: f64,
    pub snr_db: f64,
    pub rnl_db: f64,
}

/// Spherical spreading loss re 1 m.
pub fn transmission_loss_db(range_m: f64) -> AvsResult<f64> {
    if !(range_m.is_finite() && range_m > 0.0) {
        return Err(AvsError::InvalidGeometry(format!(
            "range must be positive and finite, got {}",
            range_m
        )));
    }
    Ok(20.0 * range_m.log10())
}

/// Builds the pressure and velocity channels for a sensor at `geometry`.
///
/// The pressure channel is the transmitted signal attenuated by spherical
/// spreading plus the pressure noise. Each velocity channel projects the
/// pressure channel onto its axis through the true bearing and adds its own
/// noise realization, so the intensity cross terms carry the arrival angle.
pub fn observe(
    target_strength_db: f64,
    signal: &TransmittedSignal,
    geometry: &SensorGeometry,
    noise: &SensorNoise,
) -> AvsResult<SensorObservation> {
    let logger = LogManager::new("response");
    let n = signal.len();
    let loss_db = transmission_loss_db(geometry.range_m)?;

    for (channel, series) in [
        ("pressure", &noise.pressure),
        ("velocity_x", &noise.velocity_x),
        ("velocity_y", &noise.velocity_y),
    ] {
        if series.len() != n {
            return Err(AvsError::InvalidParameter(format!(
                "{} noise has {} samples, signal has {}",
                channel,
                series.len(),
                n
            )));
        }
    }

    let gain = 10f64.powf(-loss_db / 20.0);
    let received: Vec<f64> = signal.amplitude.iter().map(|&s| s * gain).collect();
    let pressure: Vec<f64> = received
        .iter()
        .zip(&noise.pressure)
        .map(|(&s, &w)| s + w)
        .collect();

    let bearing = geometry.bearing_deg.to_radians();
    let (sin_b, cos_b) = bearing.sin_cos();
    let velocity_x = pressure
        .iter()
        .zip(&noise.velocity_x)
        .map(|(&p, &w)| p * cos_b + w)
        .collect();
    let velocity_y = pressure
        .iter()
        .zip(&noise.velocity_y)
        .map(|(&p, &w)| p * sin_b + w)
        .collect();

    let signal_power = StatsHelper::mean_power(&received);
    let noise_power = StatsHelper::mean_power(&noise.pressure);
    let snr_db = StatsHelper::power_db(signal_power) - StatsHelper::power_db(noise_power);
    let rnl_db = StatsHelper::power_db(noise_power);
    let received_level_db = target_strength_db - loss_db;

    logger.record(&format!(
        "range {:.2} m, TL {:.2} dB, RL {:.2} dB, SNR {:.2} dB, RNL {:.2} dB",
        geometry.range_m, loss_db, received_level_db, snr_db, rnl_db
    ));

    Ok(SensorObservation {
        pressure,
        velocity_x,
        velocity_y,
        transmission_loss_db: loss_db,
        received_level_db,
        snr_db,
        rnl_db,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::DEFAULT_MAX_SAMPLES;
    use crate::processing::noise::{noise_rng, SeaState};
    use crate::processing::synth::synthesize;

    fn signal() -> TransmittedSignal {
        synthesize(1.0, 1000.0, 100.0, 150.0, DEFAULT_MAX_SAMPLES).unwrap()
    }

    #[test]
    fn outputs_keep_signal_length() {
        let signal = signal();
        let geometry = SensorGeometry {
            range_m: 800.0,
            bearing_deg: 30.0,
        };
        let noise = SensorNoise::draw(SeaState::Calm, 1000.0, signal.len(), &mut noise_rng(Some(1)))
            .unwrap();
        let obs = observe(150.0, &signal, &geometry, &noise).unwrap();
        assert_eq!(obs.pressure.len(), signal.len());
        assert_eq!(obs.velocity_x.len(), signal.len());
        assert_eq!(obs.velocity_y.len(), signal.len());
        assert!(obs.snr_db.is_finite());
    }

    #[test]
    fn noiseless_pressure_is_spherically_attenuated() {
        let signal = signal();
        let geometry = SensorGeometry {
            range_m: 100.0,
            bearing_deg: 0.0,
        };
        let obs = observe(150.0, &signal, &geometry, &SensorNoise::silent(signal.len())).unwrap();
        for (p, s) in obs.pressure.iter().zip(&signal.amplitude) {
            assert!((p - s / 100.0).abs() <= 1e-9 * s.abs().max(1.0));
        }
        assert!((obs.transmission_loss_db - 40.0).abs() < 1e-12);
        assert!((obs.received_level_db - 110.0).abs() < 1e-12);
        assert_eq!(obs.rnl_db, -300.0);
    }

    #[test]
    fn velocity_channels_follow_bearing() {
        let signal = signal();
        let geometry = SensorGeometry {
            range_m: 50.0,
            bearing_deg: 90.0,
        };
        let obs = observe(150.0, &signal, &geometry, &SensorNoise::silent(signal.len())).unwrap();
        let vx_power = StatsHelper::mean_power(&obs.velocity_x);
        let vy_power = StatsHelper::mean_power(&obs.velocity_y);
        assert!(vx_power < 1e-20 * vy_power);
    }

    #[test]
    fn snr_drops_with_range() {
        let signal = signal();
        let noise = SensorNoise::draw(SeaState::Light, 1000.0, signal.len(), &mut noise_rng(Some(9)))
            .unwrap();
        let near = SensorGeometry {
            range_m: 100.0,
            bearing_deg: 10.0,
        };
        let far = SensorGeometry {
            range_m: 1000.0,
            bearing_deg: 10.0,
        };
        let near_obs = observe(150.0, &signal, &near, &noise).unwrap();
        let far_obs = observe(150.0, &signal, &far, &noise).unwrap();
        assert!((near_obs.snr_db - far_obs.snr_db - 20.0).abs() < 1e-9);
        assert_eq!(near_obs.rnl_db, far_obs.rnl_db);
    }

    #[test]
    fn zero_range_is_invalid_geometry() {
        let signal = signal();
        let geometry = SensorGeometry {
            range_m: 0.0,
            bearing_deg: 0.0,
        };
        let err = observe(150.0, &signal, &geometry, &SensorNoise::silent(signal.len())).unwrap_err();
        assert!(matches!(err, AvsError::InvalidGeometry(_)));
    }

    #[test]
    fn mismatched_noise_length_is_rejected() {
        let signal = signal();
        let geometry = SensorGeometry {
            range_m: 10.0,
            bearing_deg: 0.0,
        };
        let err = observe(150.0, &signal, &geometry, &SensorNoise::silent(10)).unwrap_err();
        assert!(matches!(err, AvsError::InvalidParameter(_)));
    }
}
