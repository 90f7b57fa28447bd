//! Fehlertypen des Putt-Lösers.
//!
//! `SolveError` trägt für jede Fehlerklasse einen stabilen numerischen
//! Statuscode, der über die C-ABI-Schicht an den Host gemeldet wird.
//! Die Codes sind historisch durch den DLL-Wrapper der Vorgängerversion
//! festgelegt und dürfen nicht umnummeriert werden.

use std::path::PathBuf;

use glam::DVec2;
use thiserror::Error;

/// Fehler beim Lösen eines Putts.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Eingabeparameter außerhalb des zulässigen Bereichs (Code 1).
    #[error("Ungueltige Eingabeparameter: {0}")]
    InvalidInput(String),

    /// DTM-Datei existiert nicht (Code 2).
    #[error("DTM-Datei nicht gefunden: {0}")]
    DtmNotFound(PathBuf),

    /// DTM-Datei konnte nicht gelesen oder geparst werden (Code 3).
    #[error("DTM-Datei fehlerhaft: {0:#}")]
    DtmRead(#[from] anyhow::Error),

    /// Ball oder Cup liegt außerhalb der Green-Daten (Code 4).
    #[error("Position '{label}' liegt ausserhalb des Greens: ({x:.2}, {y:.2})", x = .position.x, y = .position.y)]
    OutOfGreen {
        /// Welche Eingabe betroffen ist ("ball" oder "cup")
        label: &'static str,
        /// Die beanstandete Position in Green-Metern
        position: DVec2,
    },

    /// Stimp-Wert außerhalb des physikalisch sinnvollen Bereichs (Code 5).
    #[error("Ungueltiger Stimp-Wert: {0:.2} ft")]
    InvalidStimp(f64),

    /// Kein Anstellwinkel/Tempo-Paar hat den Putt gelocht (Code 6).
    #[error("Keine Loesung gefunden nach {attempts} Simulationslaeufen")]
    NoConvergence {
        /// Anzahl durchgeführter Simulationsläufe
        attempts: u32,
    },

    /// Interner Solver-Fehler (Code 8).
    #[error("Interner Solver-Fehler: {0}")]
    Internal(String),
}

impl SolveError {
    /// Numerischer Statuscode für die C-ABI-Schicht.
    ///
    /// Code 7 (Speicherfehler) wird von dieser Implementierung nie erzeugt
    /// und bleibt unbelegt.
    pub fn status_code(&self) -> i32 {
        match self {
            SolveError::InvalidInput(_) => 1,
            SolveError::DtmNotFound(_) => 2,
            SolveError::DtmRead(_) => 3,
            SolveError::OutOfGreen { .. } => 4,
            SolveError::InvalidStimp(_) => 5,
            SolveError::NoConvergence { .. } => 6,
            SolveError::Internal(_) => 8,
        }
    }
}
