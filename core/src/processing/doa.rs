use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;
use crate::prelude::{AvsError, AvsResult};
use crate::processing::response::SensorObservation;
use crate::telemetry::log::LogManager;

/// Intensity magnitude, relative to the pressure power, below which the bearing is undefined.
pub const DEGENERATE_INTENSITY_RATIO: f64 = 1e-12;

/// Bearing assigned when the intensity vector vanishes.
pub const DEGENERATE_BEARING_DEG: f64 = 0.0;

/// Bearing estimate for one sensor with the active-intensity components it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoaEstimate {
    pub bearing_deg: f64,
    pub intensity_x: f64,
    pub intensity_y: f64,
    pub degenerate: bool,
}

/// Active-intensity direction of arrival.
///
/// `Ix = <p vx>`, `Iy = <p vy>` and the bearing is `atan2(Iy, Ix)`, wrapped to
/// (-180, 180]. A vanishing intensity vector yields [`DEGENERATE_BEARING_DEG`]
/// with `degenerate` set.
pub fn estimate_bearing(pressure: &[f64], velocity_x: &[f64], velocity_y: &[f64]) -> AvsResult<DoaEstimate> {
    let logger = LogManager::new("doa");

    if pressure.is_empty() {
        return Err(AvsError::InvalidParameter("no samples to correlate".into()));
    }
    if velocity_x.len() != pressure.len() || velocity_y.len() != pressure.len() {
        return Err(AvsError::InvalidParameter(format!(
            "channel lengths differ: p {}, vx {}, vy {}",
            pressure.len(),
            velocity_x.len(),
            velocity_y.len()
        )));
    }

    let intensity_x = StatsHelper::cross_power(pressure, velocity_x);
    let intensity_y = StatsHelper::cross_power(pressure, velocity_y);
    let pressure_power = StatsHelper::mean_power(pressure);
    let magnitude = intensity_x.hypot(intensity_y);

    if !magnitude.is_finite() {
        return Err(AvsError::NumericDegeneracy(
            "intensity components are not finite".into(),
        ));
    }

    if pressure_power == 0.0 || magnitude <= DEGENERATE_INTENSITY_RATIO * pressure_power {
        logger.warn(&format!(
            "intensity vanished (|I| = {:.3e}), reporting {} deg",
            magnitude, DEGENERATE_BEARING_DEG
        ));
        return Ok(DoaEstimate {
            bearing_deg: DEGENERATE_BEARING_DEG,
            intensity_x,
            intensity_y,
            degenerate: true,
        });
    }

    let bearing_deg = StatsHelper::wrap_degrees(intensity_y.atan2(intensity_x).to_degrees());
    logger.record(&format!(
        "Ix {:.4e}, Iy {:.4e}, bearing {:.4} deg",
        intensity_x, intensity_y, bearing_deg
    ));

    Ok(DoaEstimate {
        bearing_deg,
        intensity_x,
        intensity_y,
        degenerate: false,
    })
}

/// Convenience wrapper over [`estimate_bearing`] for a full observation.
pub fn estimate_from_observation(observation: &SensorObservation) -> AvsResult<DoaEstimate> {
    estimate_bearing(
        &observation.pressure,
        &observation.velocity_x,
        &observation.velocity_y,
    )
}
