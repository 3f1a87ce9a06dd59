pub mod doa;
pub mod fusion;
pub mod geometry;
pub mod noise;
pub mod response;
pub mod synth;

pub use doa::{estimate_bearing, estimate_from_observation, DoaEstimate};
pub use fusion::{estimate_position, BearingFusion, FusionMethod, GridConfig};
pub use geometry::{true_geometry, SensorGeometry};
pub use noise::{generate_ambient_noise, noise_rng, SeaState, SensorNoise};
pub use response::{observe, transmission_loss_db, SensorObservation};
pub use synth::{synthesize, TransmittedSignal};
