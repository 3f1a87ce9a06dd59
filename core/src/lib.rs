//! Signal-physics and estimation core for acoustic vector sensor (AVS) localization.
//!
//! A single call to [`simulate`] synthesizes the target's carrier, draws
//! sea-state ambient noise, models each sensor's pressure and particle-velocity
//! channels, estimates per-sensor bearings with the active-intensity method and
//! fuses them into a 2-D fix. Every stage is a pure function of its inputs and
//! the explicitly seeded noise source.

pub mod interface;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use interface::{ScenarioParameters, SimulationReport};
pub use pipeline::{simulate, triangulate};
pub use prelude::{AvsError, AvsResult, Position, SimulationSettings};
pub use processing::SeaState;
