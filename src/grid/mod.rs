//! Einlesen von Ovation-DTM-Grid-Dateien.

pub mod parser;

pub use parser::{parse_green_grid, parse_green_grid_file, spacing_from_filename};
