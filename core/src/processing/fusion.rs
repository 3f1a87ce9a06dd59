//! Bearings-only triangulation.
//!
//! Every (sensor, bearing) pair defines a ray. Two solvers share the same
//! validation: a closed-form least-squares intersection of the bearing lines
//! and an exhaustive grid search over explicit bounds.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::math::matrix::MatrixHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{AvsError, AvsResult, Position};
use crate::telemetry::log::LogManager;

/// Relative determinant of the normal matrix below which the rays are treated as parallel.
pub const PARALLEL_RAY_TOLERANCE: f64 = 1e-12;

/// Search window and resolution for [`GridSearchFusion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub resolution_m: f64,
    pub max_cells: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_min: -2000.0,
            x_max: 2000.0,
            y_min: -2000.0,
            y_max: 2000.0,
            resolution_m: 2.0,
            max_cells: 5_000_000,
        }
    }
}

impl GridConfig {
    /// Points along one axis, `None` when the count is not finite or reaches `limit`.
    fn axis_len(min: f64, max: f64, step: f64, limit: usize) -> Option<usize> {
        let steps = ((max - min) / step).floor();
        if !steps.is_finite() || steps >= limit as f64 {
            return None;
        }
        Some(steps as usize + 1)
    }

    /// Number of (x, y) cells, validating the bounds.
    pub fn dimensions(&self) -> AvsResult<(usize, usize)> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|v| !v.is_finite()) || self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(AvsError::InvalidParameter(format!(
                "grid bounds x [{}, {}] y [{}, {}] are invalid",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        if !(self.resolution_m.is_finite() && self.resolution_m > 0.0) {
            return Err(AvsError::InvalidParameter(format!(
                "grid resolution must be positive, got {}",
                self.resolution_m
            )));
        }

        let nx = Self::axis_len(self.x_min, self.x_max, self.resolution_m, self.max_cells);
        let ny = Self::axis_len(self.y_min, self.y_max, self.resolution_m, self.max_cells);
        match (nx, ny) {
            (Some(nx), Some(ny)) if nx.checked_mul(ny).is_some_and(|c| c <= self.max_cells) => {
                Ok((nx, ny))
            }
            _ => Err(AvsError::InvalidParameter(format!(
                "grid spanning x [{}, {}] y [{}, {}] at {} m exceeds the limit of {} cells",
                self.x_min, self.x_max, self.y_min, self.y_max, self.resolution_m, self.max_cells
            ))),
        }
    }
}

/// Fusion strategy selected by configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FusionMethod {
    #[default]
    LeastSquares,
    GridSearch(GridConfig),
}

impl FusionMethod {
    pub fn solver(&self) -> Box<dyn BearingFusion + '_> {
        match self {
            FusionMethod::LeastSquares => Box::new(LeastSquaresFusion),
            FusionMethod::GridSearch(grid) => Box::new(GridSearchFusion { grid }),
        }
    }
}

/// A strategy turning co-indexed sensor positions and bearings into a fix.
pub trait BearingFusion {
    fn name(&self) -> &'static str;

    /// Called with inputs that already passed [`validate_rays`].
    fn solve(&self, sensors: &[Position], bearings_deg: &[f64]) -> AvsResult<Position>;
}

/// Minimizes the summed squared perpendicular distance to every bearing line.
pub struct LeastSquaresFusion;

impl BearingFusion for LeastSquaresFusion {
    fn name(&self) -> &'static str {
        "least_squares"
    }

    fn solve(&self, sensors: &[Position], bearings_deg: &[f64]) -> AvsResult<Position> {
        let (normal, rhs) = normal_equations(sensors, bearings_deg);
        let solution = MatrixHelper::solve_2x2(normal.view(), rhs.view()).ok_or_else(|| {
            AvsError::NumericDegeneracy("bearing lines have no unique intersection".into())
        })?;
        let fix = Position::new(solution[0], solution[1]);
        if !fix.is_finite() {
            return Err(AvsError::NumericDegeneracy(
                "least-squares fix is not finite".into(),
            ));
        }
        Ok(fix)
    }
}

/// Picks the grid point whose bearings from the sensors best match the estimates.
pub struct GridSearchFusion<'a> {
    pub grid: &'a GridConfig,
}

impl GridSearchFusion<'_> {
    fn cost(sensors: &[Position], bearings_deg: &[f64], candidate: &Position) -> f64 {
        sensors
            .iter()
            .zip(bearings_deg)
            .map(|(sensor, &bearing)| {
                StatsHelper::angular_difference(sensor.bearing_to(candidate), bearing)
            })
            .sum()
    }
}

impl BearingFusion for GridSearchFusion<'_> {
    fn name(&self) -> &'static str {
        "grid_search"
    }

    fn solve(&self, sensors: &[Position], bearings_deg: &[f64]) -> AvsResult<Position> {
        let (nx, ny) = self.grid.dimensions()?;
        let step = self.grid.resolution_m;

        let mut best = Position::new(self.grid.x_min, self.grid.y_min);
        let mut best_cost = f64::INFINITY;
        for ix in 0..nx {
            let x = self.grid.x_min + ix as f64 * step;
            for iy in 0..ny {
                let candidate = Position::new(x, self.grid.y_min + iy as f64 * step);
                let cost = Self::cost(sensors, bearings_deg, &candidate);
                if cost < best_cost {
                    best_cost = cost;
                    best = candidate;
                }
            }
        }

        if !best_cost.is_finite() {
            return Err(AvsError::NumericDegeneracy(
                "grid search found no finite cost".into(),
            ));
        }
        Ok(best)
    }
}

/// Sums `n n^T` and `n n^T s` over every ray, `n` being the ray's unit normal.
fn normal_equations(sensors: &[Position], bearings_deg: &[f64]) -> (Array2<f64>, Array1<f64>) {
    let mut normal = Array2::<f64>::zeros((2, 2));
    let mut rhs = Array1::<f64>::zeros(2);

    for (sensor, &bearing) in sensors.iter().zip(bearings_deg) {
        let (sin_b, cos_b) = bearing.to_radians().sin_cos();
        let n = [-sin_b, cos_b];
        let offset = n[0] * sensor.x + n[1] * sensor.y;
        for row in 0..2 {
            for col in 0..2 {
                normal[[row, col]] += n[row] * n[col];
            }
            rhs[row] += n[row] * offset;
        }
    }
    (normal, rhs)
}

/// Checks the ray set before any solver runs.
pub fn validate_rays(sensors: &[Position], bearings_deg: &[f64]) -> AvsResult<()> {
    if sensors.len() != bearings_deg.len() {
        return Err(AvsError::InvalidParameter(format!(
            "{} sensors but {} bearings",
            sensors.len(),
            bearings_deg.len()
        )));
    }
    if sensors.len() < 2 {
        return Err(AvsError::InsufficientGeometry(format!(
            "need at least two bearings, got {}",
            sensors.len()
        )));
    }
    if sensors.iter().any(|s| !s.is_finite()) {
        return Err(AvsError::InvalidParameter(
            "sensor positions must be finite".into(),
        ));
    }
    if bearings_deg.iter().any(|b| !b.is_finite()) {
        return Err(AvsError::NumericDegeneracy("bearing is not finite".into()));
    }

    let (normal, _) = normal_equations(sensors, bearings_deg);
    let det = MatrixHelper::determinant_2x2(normal.view());
    let trace = normal[[0, 0]] + normal[[1, 1]];
    if det <= PARALLEL_RAY_TOLERANCE * trace * trace {
        return Err(AvsError::NumericDegeneracy(format!(
            "bearing rays are parallel (det {:.3e})",
            det
        )));
    }
    Ok(())
}

/// Fuses co-indexed sensor positions and bearings into a target fix.
pub fn estimate_position(
    sensors: &[Position],
    bearings_deg: &[f64],
    method: &FusionMethod,
) -> AvsResult<Position> {
    let logger = LogManager::new("fusion");
    validate_rays(sensors, bearings_deg)?;

    let solver = method.solver();
    let fix = solver.solve(sensors, bearings_deg)?;
    logger.record(&format!(
        "{} fix ({:.3}, {:.3}) from {} rays",
        solver.name(),
        fix.x,
        fix.y,
        sensors.len()
    ));
    Ok(fix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_bearings(sensors: &[Position], target: &Position) -> Vec<f64> {
        sensors.iter().map(|s| s.bearing_to(target)).collect()
    }

    #[test]
    fn least_squares_recovers_target_from_exact_bearings() {
        let sensors = [Position::new(0.0, 20.0), Position::new(0.0, 40.0)];
        let target = Position::new(800.0, 0.0);
        let bearings = exact_bearings(&sensors, &target);

        let fix = estimate_position(&sensors, &bearings, &FusionMethod::LeastSquares).unwrap();
        assert!(fix.distance_to(&target) < 1e-6, "fix {:?}", fix);
    }

    #[test]
    fn least_squares_handles_repeated_sensor() {
        let sensors = [
            Position::new(0.0, 20.0),
            Position::new(0.0, 40.0),
            Position::new(0.0, 40.0),
        ];
        let target = Position::new(800.0, 0.0);
        let bearings = exact_bearings(&sensors, &target);

        let fix = estimate_position(&sensors, &bearings, &FusionMethod::LeastSquares).unwrap();
        assert!(fix.distance_to(&target) < 1e-6);
    }

    #[test]
    fn grid_search_recovers_on_grid_target() {
        let sensors = [Position::new(0.0, 20.0), Position::new(0.0, 40.0)];
        let target = Position::new(800.0, 0.0);
        let bearings = exact_bearings(&sensors, &target);
        let method = FusionMethod::GridSearch(GridConfig {
            x_min: 700.0,
            x_max: 900.0,
            y_min: -50.0,
            y_max: 50.0,
            resolution_m: 1.0,
            ..Default::default()
        });

        let fix = estimate_position(&sensors, &bearings, &method).unwrap();
        assert_eq!(fix, target);
    }

    #[test]
    fn single_sensor_is_insufficient() {
        let err = estimate_position(&[Position::new(0.0, 0.0)], &[45.0], &FusionMethod::LeastSquares)
            .unwrap_err();
        assert!(matches!(err, AvsError::InsufficientGeometry(_)));
    }

    #[test]
    fn parallel_rays_are_degenerate() {
        let sensors = [Position::new(0.0, 0.0), Position::new(0.0, 10.0)];
        let err = estimate_position(&sensors, &[0.0, 0.0], &FusionMethod::LeastSquares).unwrap_err();
        assert!(matches!(err, AvsError::NumericDegeneracy(_)));

        let err = estimate_position(&sensors, &[30.0, -150.0], &FusionMethod::default()).unwrap_err();
        assert!(matches!(err, AvsError::NumericDegeneracy(_)));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let sensors = [Position::new(0.0, 0.0), Position::new(0.0, 10.0)];
        let err = estimate_position(&sensors, &[10.0], &FusionMethod::LeastSquares).unwrap_err();
        assert!(matches!(err, AvsError::InvalidParameter(_)));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let grid = GridConfig {
            resolution_m: 0.01,
            ..Default::default()
        };
        assert!(matches!(grid.dimensions(), Err(AvsError::InvalidParameter(_))));
    }

    #[test]
    fn astronomical_grid_span_is_rejected_without_overflow() {
        let grid = GridConfig {
            x_min: -1e300,
            x_max: 1e300,
            resolution_m: 1e-300,
            ..Default::default()
        };
        assert!(matches!(grid.dimensions(), Err(AvsError::InvalidParameter(_))));

        let sensors = [Position::new(0.0, 20.0), Position::new(0.0, 40.0)];
        let bearings = exact_bearings(&sensors, &Position::new(800.0, 0.0));
        let method = FusionMethod::GridSearch(GridConfig {
            x_min: f64::MIN / 2.0,
            x_max: f64::MAX / 2.0,
            resolution_m: 1.0,
            ..Default::default()
        });
        let err = estimate_position(&sensors, &bearings, &method).unwrap_err();
        assert!(matches!(err, AvsError::InvalidParameter(_)));
    }

    #[test]
    fn default_fusion_is_least_squares() {
        assert_eq!(FusionMethod::default(), FusionMethod::LeastSquares);
    }
}
