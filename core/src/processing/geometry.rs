use serde::{Deserialize, Serialize};

use crate::prelude::{AvsError, AvsResult, Position};

/// True range and bearing from one sensor to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorGeometry {
    pub range_m: f64,
    pub bearing_deg: f64,
}

/// Range and bearing for every sensor, co-indexed with `sensors`.
pub fn true_geometry(sensors: &[Position], target: &Position) -> AvsResult<Vec<SensorGeometry>> {
    if !target.is_finite() {
        return Err(AvsError::InvalidParameter(
            "target position must be finite".into(),
        ));
    }

    sensors
        .iter()
        .enumerate()
        .map(|(idx, sensor)| {
            if !sensor.is_finite() {
                return Err(AvsError::InvalidParameter(format!(
                    "sensor {} position must be finite",
                    idx
                )));
            }
            if sensor == target {
                return Err(AvsError::InvalidGeometry(format!(
                    "sensor {} coincides with the target at ({}, {})",
                    idx, target.x, target.y
                )));
            }
            Ok(SensorGeometry {
                range_m: sensor.distance_to(target),
                bearing_deg: sensor.bearing_to(target),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_euclidean_and_repeatable() {
        let sensors = [Position::new(0.0, 20.0), Position::new(0.0, 40.0)];
        let target = Position::new(800.0, 0.0);

        let first = true_geometry(&sensors, &target).unwrap();
        let second = true_geometry(&sensors, &target).unwrap();
        assert_eq!(first, second);
        assert!((first[0].range_m - (800.0f64 * 800.0 + 20.0 * 20.0).sqrt()).abs() < 1e-9);
        assert!((first[1].range_m - (800.0f64 * 800.0 + 40.0 * 40.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn bearing_uses_target_relative_offset() {
        let sensors = [Position::new(0.0, 20.0)];
        let geometry = true_geometry(&sensors, &Position::new(800.0, 0.0)).unwrap();
        let expected = (-20.0f64).atan2(800.0).to_degrees();
        assert_eq!(geometry[0].bearing_deg, expected);
        assert!(geometry[0].bearing_deg < 0.0);
    }

    #[test]
    fn coincident_sensor_is_rejected() {
        let sensors = [Position::new(0.0, 20.0), Position::new(5.0, 5.0)];
        let err = true_geometry(&sensors, &Position::new(5.0, 5.0)).unwrap_err();
        assert!(matches!(err, AvsError::InvalidGeometry(_)));
    }
}
