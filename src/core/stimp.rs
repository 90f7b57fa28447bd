//! Stimp-Rating und daraus abgeleitete Rollreibung.
//!
//! Ein Stimpmeter entlässt den Ball mit ~1.83 m/s auf das Green; die
//! gemessene Rolldistanz (in Fuß + Zoll) ist das Stimp-Rating. Daraus
//! folgt die konstante Verzögerung auf ebenem Green:
//! `a = v0² / (2 * d)`.

use crate::error::SolveError;

/// Abrollgeschwindigkeit des Stimpmeters in m/s.
pub const STIMP_RELEASE_SPEED_MPS: f64 = 1.83;
/// Meter pro Fuß.
pub const FOOT_M: f64 = 0.3048;
/// Obergrenze plausibler Stimp-Werte in Fuß.
pub const STIMP_MAX_FT: f64 = 20.0;

/// Green-Geschwindigkeit als Stimpmeter-Messung (Fuß + Zoll).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stimp {
    feet: f64,
    inches: f64,
}

impl Stimp {
    /// Erstellt ein Stimp-Rating aus Fuß- und Zoll-Komponente.
    ///
    /// Die Komponenten kommen getrennt über die C-ABI; zulässig ist ein
    /// Gesamtwert in (0, 20] Fuß mit nichtnegativen Komponenten.
    pub fn new(feet: f64, inches: f64) -> Result<Self, SolveError> {
        let total_ft = feet + inches / 12.0;
        if !total_ft.is_finite() || feet < 0.0 || inches < 0.0 {
            return Err(SolveError::InvalidStimp(total_ft));
        }
        if total_ft <= 0.0 || total_ft > STIMP_MAX_FT {
            return Err(SolveError::InvalidStimp(total_ft));
        }
        Ok(Self { feet, inches })
    }

    /// Gesamtwert in Fuß.
    pub fn total_feet(&self) -> f64 {
        self.feet + self.inches / 12.0
    }

    /// Stimp-Rolldistanz in Metern.
    pub fn distance_m(&self) -> f64 {
        self.total_feet() * FOOT_M
    }

    /// Rollverzögerung auf ebenem Green in m/s².
    pub fn friction_decel_mps2(&self) -> f64 {
        let d = self.distance_m();
        STIMP_RELEASE_SPEED_MPS * STIMP_RELEASE_SPEED_MPS / (2.0 * d)
    }
}
