//! Koordinatentransformationen rund um das Green.
//!
//! Zwei Stufen wie im bestehenden Ovation-Datenfluss:
//! 1. projiziert (State-Plane-Meter) ↔ Green-lokal: Translation um den
//!    Green-Ursprung plus Rotation (CCW positiv).
//! 2. WGS84-Punktpaar → lokale X/Y-Offsets in Metern über achsweise
//!    Haversine-Distanzen mit Vorzeichen aus den Koordinatendifferenzen.
//!
//! Die volle WGS84→State-Plane-Projektion (EPSG) bleibt externem Tooling
//! überlassen; Manifeste transportieren nur den EPSG-Code.

use glam::DVec2;

/// Mittlerer Erdradius in Metern (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Lage eines Greens im projizierten System.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenLocalTransform {
    /// Green-Ursprung in projizierten Metern
    pub origin_projected_m: DVec2,
    /// Rotation des Greens gegenüber dem projizierten System (Grad, CCW positiv)
    pub rotation_deg: f64,
}

impl GreenLocalTransform {
    /// Erstellt eine Transformation aus Ursprung und Rotation.
    pub fn new(origin_projected_m: DVec2, rotation_deg: f64) -> Self {
        Self {
            origin_projected_m,
            rotation_deg,
        }
    }

    /// Projizierte Koordinaten → Green-lokale Meter.
    pub fn to_local(&self, projected: DVec2) -> DVec2 {
        let delta = projected - self.origin_projected_m;
        rotate(delta, -self.rotation_deg.to_radians())
    }

    /// Green-lokale Meter → projizierte Koordinaten.
    pub fn to_projected(&self, local: DVec2) -> DVec2 {
        rotate(local, self.rotation_deg.to_radians()) + self.origin_projected_m
    }
}

fn rotate(v: DVec2, angle_rad: f64) -> DVec2 {
    let (sin, cos) = angle_rad.sin_cos();
    DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Lokale X/Y-Offsets eines WGS84-Punkts relativ zu einem Referenzpunkt.
///
/// X wächst nach Osten, Y nach Norden. Beträge über achsweise
/// Haversine-Distanzen, Vorzeichen über die Koordinatendifferenz
/// (GeoDist-Methode der Vorgänger-Tools; für Green-Dimensionen ist der
/// Unterschied zur geodätischen Distanz vernachlässigbar).
pub fn wgs84_local_offsets(ref_lat: f64, ref_lon: f64, lat: f64, lon: f64) -> DVec2 {
    let x_mag = haversine_m(ref_lat, ref_lon, ref_lat, lon);
    let y_mag = haversine_m(ref_lat, ref_lon, lat, ref_lon);

    let x = -x_mag.copysign(ref_lon - lon);
    let y = -y_mag.copysign(ref_lat - lat);
    DVec2::new(x, y)
}

/// Haversine-Distanz zweier WGS84-Punkte in Metern.
fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}
