use crate::interface::{PositionEstimate, ScenarioParameters, SensorReport, SimulationReport};
use crate::math::stats::StatsHelper;
use crate::prelude::{AvsResult, Position, SimulationSettings};
use crate::processing::doa::estimate_from_observation;
use crate::processing::fusion::estimate_position;
use crate::processing::geometry::true_geometry;
use crate::processing::noise::{noise_rng, SensorNoise};
use crate::processing::response::observe;
use crate::processing::synth::synthesize;
use crate::telemetry::log::LogManager;

/// Runs the full detection and localization chain for one scenario.
///
/// Stages run in a fixed order: geometry, synthesis, per-sensor noise,
/// per-sensor response, per-sensor DOA, fusion. The first failing stage aborts
/// the run and its error is returned as is.
pub fn simulate(scenario: &ScenarioParameters, settings: &SimulationSettings) -> AvsResult<SimulationReport> {
    let mut rng = noise_rng(scenario.seed);
    run_with_noise(scenario, settings, |n| {
        SensorNoise::draw(scenario.sea_state, scenario.sampling_rate_hz, n, &mut rng)
    })
}

pub(crate) fn run_with_noise<F>(
    scenario: &ScenarioParameters,
    settings: &SimulationSettings,
    mut draw_noise: F,
) -> AvsResult<SimulationReport>
where
    F: FnMut(usize) -> AvsResult<SensorNoise>,
{
    let logger = LogManager::new("pipeline");
    scenario.validate()?;

    let geometry = true_geometry(&scenario.sensors, &scenario.target)?;
    let signal = synthesize(
        scenario.duration_s,
        scenario.sampling_rate_hz,
        scenario.frequency_hz,
        scenario.target_strength_db,
        settings.max_samples,
    )?;

    let noises = scenario
        .sensors
        .iter()
        .map(|_| draw_noise(signal.len()))
        .collect::<AvsResult<Vec<_>>>()?;

    let observations = geometry
        .iter()
        .zip(&noises)
        .map(|(geo, noise)| observe(scenario.target_strength_db, &signal, geo, noise))
        .collect::<AvsResult<Vec<_>>>()?;

    let estimates = observations
        .iter()
        .map(estimate_from_observation)
        .collect::<AvsResult<Vec<_>>>()?;

    let bearings: Vec<f64> = estimates.iter().map(|e| e.bearing_deg).collect();
    let fix = estimate_position(&scenario.sensors, &bearings, &settings.fusion)?;
    let range_error_m = fix.distance_to(&scenario.target);

    let sensors: Vec<SensorReport> = scenario
        .sensors
        .iter()
        .zip(geometry)
        .zip(noises)
        .zip(observations)
        .zip(estimates)
        .map(|((((&position, geo), noise), observation), doa)| SensorReport {
            position,
            range_m: geo.range_m,
            true_bearing_deg: geo.bearing_deg,
            noise: noise.pressure,
            observation,
            doa_error_deg: StatsHelper::angular_difference(doa.bearing_deg, geo.bearing_deg),
            doa,
        })
        .collect();

    logger.summary(&format!(
        "{} sensors, sea state {}, fix ({:.2}, {:.2}), range error {:.3} m",
        sensors.len(),
        scenario.sea_state,
        fix.x,
        fix.y,
        range_error_m
    ));

    Ok(SimulationReport {
        scenario: scenario.clone(),
        signal,
        sensors,
        position: PositionEstimate {
            x: fix.x,
            y: fix.y,
            range_error_m,
            method: settings.fusion.solver().name().to_string(),
        },
    })
}

/// Fused fix for explicit bearings, bypassing signal simulation.
pub fn triangulate(
    sensors: &[Position],
    bearings_deg: &[f64],
    settings: &SimulationSettings,
) -> AvsResult<Position> {
    estimate_position(sensors, bearings_deg, &settings.fusion)
}
