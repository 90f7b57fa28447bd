//! Datensatz-Registry und Green-Manifeste.
//!
//! `datasets.json` ordnet DTM-IDs den Grid-Dateien und Manifesten zu;
//! relative Pfade gelten relativ zum Registry-Verzeichnis. Das Manifest
//! trägt die Lage des Greens im projizierten System (für die
//! Koordinatentransformation) plus beschreibende Metadaten.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::transform::GreenLocalTransform;

/// Ein Punkt in projizierten Metern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

/// Ein Eintrag der Datensatz-Registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetEntry {
    /// Eindeutige DTM-Kennung (z.B. "riverside_2023_20cm")
    pub dtm_id: String,
    /// Kurs-Kennung
    pub course_id: String,
    /// Lochnummer (1-18)
    pub hole_id: u32,
    /// Pfad zur Grid-Datei, relativ zum Registry-Verzeichnis
    pub grid_path: String,
    /// Pfad zum Manifest, relativ zum Registry-Verzeichnis
    #[serde(default)]
    pub manifest_path: Option<String>,
}

/// Wertebereich des Stimp-Ratings eines Greens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StimpRange {
    pub min: f64,
    pub max: f64,
}

/// Grid-Dimensionen im Manifest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridDimensions {
    pub rows: usize,
    pub cols: usize,
}

/// Elevationsbereich im Manifest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElevationRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Manifest eines Green-DTMs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GreenManifest {
    pub dtm_id: String,
    pub course_id: String,
    pub hole_id: u32,
    /// Green-Ursprung in projizierten Metern
    pub green_origin_projected_m: ProjectedPoint,
    /// Rotation des Greens gegenüber dem projizierten System (Grad)
    pub green_rotation_deg: f64,
    pub grid_spacing_m: f64,
    pub grid_dimensions: GridDimensions,
    pub elevation_range: ElevationRange,
    pub data_coverage_pct: f64,
    pub stimp_range: StimpRange,
    /// EPSG-Code der State-Plane-Projektion (nur für externes Tooling)
    #[serde(default)]
    pub state_plane_epsg: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl GreenManifest {
    /// Transformation projiziert ↔ Green-lokal aus den Manifest-Feldern.
    pub fn transform(&self) -> GreenLocalTransform {
        GreenLocalTransform::new(
            glam::DVec2::new(
                self.green_origin_projected_m.x,
                self.green_origin_projected_m.y,
            ),
            self.green_rotation_deg,
        )
    }
}

/// Geladene Datensatz-Registry.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    datasets: Vec<DatasetEntry>,
    /// Verzeichnis der Registry-Datei (Basis für relative Pfade)
    base_dir: PathBuf,
}

/// Serde-Form der Registry-Datei.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    datasets: Vec<DatasetEntry>,
}

impl DatasetRegistry {
    /// Lädt die Registry aus einer `datasets.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Registry nicht lesbar: {}", path.display()))?;
        let file: RegistryFile = serde_json::from_str(&text)
            .with_context(|| format!("Registry fehlerhaft: {}", path.display()))?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        log::info!(
            "Registry geladen: {} Datensaetze aus {}",
            file.datasets.len(),
            path.display()
        );

        Ok(Self {
            datasets: file.datasets,
            base_dir,
        })
    }

    /// Alle Einträge in Dateireihenfolge.
    pub fn datasets(&self) -> &[DatasetEntry] {
        &self.datasets
    }

    /// Sucht einen Eintrag per DTM-ID.
    pub fn find(&self, dtm_id: &str) -> Option<&DatasetEntry> {
        self.datasets.iter().find(|d| d.dtm_id == dtm_id)
    }

    /// Sucht einen Eintrag per Kurs und Loch.
    pub fn find_by_hole(&self, course_id: &str, hole_id: u32) -> Option<&DatasetEntry> {
        self.datasets
            .iter()
            .find(|d| d.course_id == course_id && d.hole_id == hole_id)
    }

    /// Löst die DTM-ID zum absoluten Grid-Pfad auf.
    pub fn resolve_grid_path(&self, dtm_id: &str) -> Result<PathBuf> {
        let entry = self
            .find(dtm_id)
            .with_context(|| format!("Unbekannte DTM-ID: {dtm_id}"))?;
        Ok(self.base_dir.join(&entry.grid_path))
    }

    /// Lädt das Manifest zu einer DTM-ID, sofern eines hinterlegt ist.
    pub fn load_manifest(&self, dtm_id: &str) -> Result<Option<GreenManifest>> {
        let entry = self
            .find(dtm_id)
            .with_context(|| format!("Unbekannte DTM-ID: {dtm_id}"))?;

        let Some(rel) = &entry.manifest_path else {
            return Ok(None);
        };
        let path = self.base_dir.join(rel);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Manifest nicht lesbar: {}", path.display()))?;
        let manifest: GreenManifest = serde_json::from_str(&text)
            .with_context(|| format!("Manifest fehlerhaft: {}", path.display()))?;
        Ok(Some(manifest))
    }
}
