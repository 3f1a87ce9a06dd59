pub mod report;
pub mod scenario;

pub use report::{Channel, PositionEstimate, SensorReport, SimulationReport};
pub use scenario::ScenarioParameters;
