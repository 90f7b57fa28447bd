//! Geteilte Typen zwischen Library, CLI und FFI-Schicht.

pub mod options;

pub use options::SolverOptions;
