use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::prelude::{AvsError, AvsResult};
use crate::telemetry::log::LogManager;

/// Carrier radiated by the target together with its time base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmittedSignal {
    pub amplitude: Vec<f64>,
    pub time: Vec<f64>,
    pub sampling_rate_hz: f64,
}

impl TransmittedSignal {
    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }
}

/// Linear pressure amplitude (re 1 uPa) for a level in dB.
pub fn level_to_amplitude(level_db: f64) -> f64 {
    10f64.powf(level_db / 20.0)
}

/// Number of samples covering `duration_s` at `sampling_rate_hz`, capped at `max_samples`.
pub fn sample_count(duration_s: f64, sampling_rate_hz: f64, max_samples: usize) -> AvsResult<usize> {
    if !(duration_s.is_finite() && duration_s > 0.0) {
        return Err(AvsError::InvalidParameter(format!(
            "duration must be positive, got {}",
            duration_s
        )));
    }
    if !(sampling_rate_hz.is_finite() && sampling_rate_hz > 0.0) {
        return Err(AvsError::InvalidParameter(format!(
            "sampling rate must be positive, got {}",
            sampling_rate_hz
        )));
    }

    let exact = (duration_s * sampling_rate_hz).floor();
    if exact < 1.0 {
        return Err(AvsError::InvalidParameter(format!(
            "{} s at {} Hz yields no samples",
            duration_s, sampling_rate_hz
        )));
    }
    if exact > max_samples as f64 {
        return Err(AvsError::InvalidParameter(format!(
            "{} samples exceeds the limit of {}",
            exact, max_samples
        )));
    }
    Ok(exact as usize)
}

/// Synthesizes `A sin(2 pi f t)` with `A = 10^(TS/20)` over `[0, duration)`.
pub fn synthesize(
    duration_s: f64,
    sampling_rate_hz: f64,
    frequency_hz: f64,
    target_strength_db: f64,
    max_samples: usize,
) -> AvsResult<TransmittedSignal> {
    let logger = LogManager::new("synth");

    if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
        return Err(AvsError::InvalidParameter(format!(
            "carrier frequency must be positive, got {}",
            frequency_hz
        )));
    }
    if !target_strength_db.is_finite() {
        return Err(AvsError::InvalidParameter(
            "target strength must be finite".into(),
        ));
    }
    let n = sample_count(duration_s, sampling_rate_hz, max_samples)?;
    if sampling_rate_hz <= 2.0 * frequency_hz {
        return Err(AvsError::InvalidParameter(format!(
            "carrier {} Hz is at or above the Nyquist limit of {} Hz",
            frequency_hz,
            sampling_rate_hz / 2.0
        )));
    }

    let peak = level_to_amplitude(target_strength_db);
    let omega = 2.0 * PI * frequency_hz;
    let time: Vec<f64> = (0..n).map(|i| i as f64 / sampling_rate_hz).collect();
    let amplitude = time.iter().map(|&t| peak * (omega * t).sin()).collect();

    logger.record(&format!(
        "{} samples, carrier {} Hz, peak {:.3e}",
        n, frequency_hz, peak
    ));

    Ok(TransmittedSignal {
        amplitude,
        time,
        sampling_rate_hz,
    })
}
