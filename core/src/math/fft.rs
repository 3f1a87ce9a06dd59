use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::prelude::{AvsError, AvsResult};

/// Helper that wraps the `rustfft` planner for reuse.
pub struct FftHelper {
    fft: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Forward transform of a real series, zero-padded or truncated to the planned size.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(self.size)
            .map(|&value| Complex64::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::zero());
        self.fft.process(&mut buffer);
        buffer
    }
}

/// One-sided magnitude spectrum of a real series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeSpectrum {
    pub frequency_hz: Vec<f64>,
    pub magnitude: Vec<f64>,
}

impl AmplitudeSpectrum {
    /// Frequency of the strongest bin, if any.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.magnitude
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| self.frequency_hz[idx])
    }
}

/// Magnitude of the non-negative half of the DFT, bin spacing `fs / n`.
pub fn amplitude_spectrum(samples: &[f64], sampling_rate_hz: f64) -> AvsResult<AmplitudeSpectrum> {
    if samples.is_empty() {
        return Err(AvsError::InvalidParameter("no samples to transform".into()));
    }
    if !(sampling_rate_hz.is_finite() && sampling_rate_hz > 0.0) {
        return Err(AvsError::InvalidParameter(format!(
            "sampling rate must be positive, got {}",
            sampling_rate_hz
        )));
    }

    let n = samples.len();
    let transformed = FftHelper::new(n).forward(samples);
    let half = n / 2;
    let bin_width = sampling_rate_hz / n as f64;

    Ok(AmplitudeSpectrum {
        frequency_hz: (0..half).map(|k| k as f64 * bin_width).collect(),
        magnitude: transformed[..half].iter().map(|c| c.norm()).collect(),
    })
}
