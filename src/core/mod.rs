//! Kern-Datenmodell und Algorithmen des Putt-Lösers.

pub mod green_model;
pub mod instruction;
pub mod physics;
pub mod solver;
pub mod stimp;
pub mod transform;

pub use green_model::{GreenModel, GridMetadata};
pub use instruction::render_instruction;
pub use physics::{simulate_roll, RollOutcome, RollPath};
pub use solver::{solve_single, PuttRequest, PuttSolution};
pub use stimp::Stimp;
pub use transform::{wgs84_local_offsets, GreenLocalTransform};
