//! Sea-state driven ambient noise.
//!
//! Noise is zero-mean white Gaussian with a variance equal to the band level
//! across `[0, fs/2]`, derived from the Knudsen spectrum level of the sea state.
//! Every draw consumes standard-normal variates from the caller's generator,
//! so two sea states drawn from equally seeded generators differ only in scale.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::stats::StatsHelper;
use crate::prelude::{AvsError, AvsResult};
use crate::telemetry::log::LogManager;

/// Sea states accepted by the simulator, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeaState {
    Calm,
    Light,
    Moderate,
    Rough,
}

impl SeaState {
    pub const ALL: [SeaState; 4] = [
        SeaState::Calm,
        SeaState::Light,
        SeaState::Moderate,
        SeaState::Rough,
    ];

    /// Integer code used by the control panel (0, 1, 3, 6).
    pub fn code(self) -> u8 {
        match self {
            SeaState::Calm => 0,
            SeaState::Light => 1,
            SeaState::Moderate => 3,
            SeaState::Rough => 6,
        }
    }

    /// Noise spectrum level at 1 kHz, dB re 1 uPa^2/Hz.
    pub fn spectrum_level_db(self) -> f64 {
        match self {
            SeaState::Calm => 44.5,
            SeaState::Light => 55.5,
            SeaState::Moderate => 64.5,
            SeaState::Rough => 70.5,
        }
    }

    /// Noise level integrated over `[0, fs/2]`, dB re 1 uPa.
    pub fn band_level_db(self, sampling_rate_hz: f64) -> f64 {
        self.spectrum_level_db() + 10.0 * (sampling_rate_hz / 2.0).log10()
    }
}

impl TryFrom<u8> for SeaState {
    type Error = AvsError;

    fn try_from(code: u8) -> AvsResult<Self> {
        SeaState::ALL
            .into_iter()
            .find(|state| state.code() == code)
            .ok_or_else(|| {
                AvsError::InvalidParameter(format!(
                    "unknown sea state code {} (expected 0, 1, 3 or 6)",
                    code
                ))
            })
    }
}

impl fmt::Display for SeaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeaState::Calm => "calm",
            SeaState::Light => "light",
            SeaState::Moderate => "moderate",
            SeaState::Rough => "rough",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Random source for noise draws: seeded for reproducible runs, entropy otherwise.
pub fn noise_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws `n` ambient-noise samples for `sea_state` at `sampling_rate_hz`.
pub fn generate_ambient_noise<R: Rng + ?Sized>(
    sea_state: SeaState,
    sampling_rate_hz: f64,
    n: usize,
    rng: &mut R,
) -> AvsResult<Vec<f64>> {
    if !(sampling_rate_hz.is_finite() && sampling_rate_hz > 0.0) {
        return Err(AvsError::InvalidParameter(format!(
            "sampling rate must be positive, got {}",
            sampling_rate_hz
        )));
    }

    let std_dev = 10f64.powf(sea_state.band_level_db(sampling_rate_hz) / 20.0);
    Ok((0..n)
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut *rng);
            std_dev * z
        })
        .collect())
}

/// Independent noise realizations for the three channels of one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorNoise {
    pub pressure: Vec<f64>,
    pub velocity_x: Vec<f64>,
    pub velocity_y: Vec<f64>,
}

impl SensorNoise {
    /// Pressure noise at full level; each velocity axis carries half the power.
    pub fn draw<R: Rng + ?Sized>(
        sea_state: SeaState,
        sampling_rate_hz: f64,
        n: usize,
        rng: &mut R,
    ) -> AvsResult<Self> {
        let logger = LogManager::new("noise");
        let pressure = generate_ambient_noise(sea_state, sampling_rate_hz, n, rng)?;
        let axis_scale = std::f64::consts::FRAC_1_SQRT_2;
        let velocity_x = generate_ambient_noise(sea_state, sampling_rate_hz, n, rng)?
            .into_iter()
            .map(|v| v * axis_scale)
            .collect();
        let velocity_y = generate_ambient_noise(sea_state, sampling_rate_hz, n, rng)?
            .into_iter()
            .map(|v| v * axis_scale)
            .collect();

        logger.record(&format!(
            "{} samples, sea state {}, band level {:.2} dB, pressure RMS {:.3e}",
            n,
            sea_state,
            sea_state.band_level_db(sampling_rate_hz),
            StatsHelper::rms(&pressure)
        ));

        Ok(Self {
            pressure,
            velocity_x,
            velocity_y,
        })
    }

    /// Noise-free realization of length `n`.
    pub fn silent(n: usize) -> Self {
        Self {
            pressure: vec![0.0; n],
            velocity_x: vec![0.0; n],
            velocity_y: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }
}
