pub mod fft;
pub mod matrix;
pub mod stats;

pub use fft::{amplitude_spectrum, AmplitudeSpectrum, FftHelper};
pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
