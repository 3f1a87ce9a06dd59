/// Floor applied to powers before conversion to decibels.
pub const POWER_FLOOR: f64 = 1e-30;

pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f64]) -> f64 {
        Self::mean_power(samples).sqrt()
    }

    /// Mean of the squared samples.
    pub fn mean_power(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        sum_sq / samples.len() as f64
    }

    /// Time-averaged product of two equally long series.
    pub fn cross_power(lhs: &[f64], rhs: &[f64]) -> f64 {
        let len = lhs.len().min(rhs.len());
        if len == 0 {
            return 0.0;
        }
        let sum: f64 = lhs.iter().zip(rhs).map(|(&a, &b)| a * b).sum();
        sum / len as f64
    }

    pub fn power_db(power: f64) -> f64 {
        10.0 * power.max(POWER_FLOOR).log10()
    }

    /// Wraps an angle into (-180, 180].
    pub fn wrap_degrees(angle: f64) -> f64 {
        let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
        if wrapped == -180.0 {
            180.0
        } else {
            wrapped
        }
    }

    /// Absolute angular separation in [0, 180].
    pub fn angular_difference(a: f64, b: f64) -> f64 {
        Self::wrap_degrees(a - b).abs()
    }
}
