//! Ovation Putt-Solver Library.
//! Core-Funktionalität als Library exportiert für die CLI, die FFI-Schicht
//! und Tests: DTM-Grid-Modell, Ballroll-Physik und Putt-Löser.

pub mod core;
pub mod error;
pub mod grid;
pub mod registry;
pub mod shared;

pub use core::{GreenModel, GridMetadata, PuttRequest, PuttSolution, RollOutcome, Stimp};
pub use core::{render_instruction, solve_single, GreenLocalTransform};
pub use error::SolveError;
pub use grid::{parse_green_grid, parse_green_grid_file};
pub use registry::{DatasetEntry, DatasetRegistry, GreenManifest};
pub use shared::SolverOptions;
