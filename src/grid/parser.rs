//! Parser für Ovation-DTM-Grid-Dateien.
//!
//! Format: tab-separierte Elevationswerte in Metern, eine Grid-Zeile pro
//! Dateizeile, `-1.000` markiert Zellen ohne Daten (außerhalb des
//! Greens). Der Zellabstand steckt per Konvention im Dateinamen
//! (z.B. `Riverside_20cm_Grid.txt` → 0.2 m).

use std::path::Path;

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::core::green_model::GreenModel;
use crate::error::SolveError;

/// Zellabstand, wenn der Dateiname keinen Hinweis enthält (m).
pub const DEFAULT_SPACING_M: f64 = 0.2;

/// Liest den Zellabstand aus einem Dateinamen.
///
/// Erkannt wird eine Zentimeterangabe wie `_20cm_` oder `10cm`;
/// ohne Treffer gilt `DEFAULT_SPACING_M`.
pub fn spacing_from_filename(path: &Path) -> f64 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let re = Regex::new(r"(\d+)\s*cm").expect("statisches Pattern");
    re.captures(&name)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .map(|cm| cm / 100.0)
        .filter(|m| *m > 0.0)
        .unwrap_or(DEFAULT_SPACING_M)
}

/// Parsed ein Elevationsgrid aus Text.
///
/// Erwartet ein rechteckiges Grid; leere Eingaben, nicht-numerische Werte
/// und uneinheitliche Zeilenlängen sind Fehler.
pub fn parse_green_grid(text: &str, spacing_m: f64) -> Result<GreenModel> {
    if spacing_m <= 0.0 || !spacing_m.is_finite() {
        bail!("Ungueltiger Zellabstand: {spacing_m}");
    }

    let mut cells: Vec<f64> = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0usize;

    for (line_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut row_cells = 0usize;
        for value in line.split('\t') {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            let elevation: f64 = trimmed.parse().with_context(|| {
                format!(
                    "Wert '{}' in Zeile {} konnte nicht geparst werden",
                    truncate_for_error(trimmed),
                    line_index + 1
                )
            })?;
            cells.push(elevation);
            row_cells += 1;
        }

        if row_cells == 0 {
            continue;
        }
        match cols {
            None => cols = Some(row_cells),
            Some(expected) if expected != row_cells => {
                bail!(
                    "Zeile {} hat {} Werte, erwartet {}",
                    line_index + 1,
                    row_cells,
                    expected
                );
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let Some(cols) = cols else {
        bail!("Grid-Datei enthaelt keine Werte");
    };

    let green = GreenModel::new(cells, rows, cols, spacing_m);
    let meta = green.metadata();
    log::info!(
        "DTM geladen: {}x{} Zellen, {:.2} m Raster, {:.1}% Abdeckung",
        meta.rows,
        meta.cols,
        meta.spacing_m,
        meta.data_coverage_pct
    );

    Ok(green)
}

/// Liest und parsed eine Grid-Datei; Zellabstand aus dem Dateinamen.
///
/// Die Fehlerklassen sind getrennt, damit die ABI-Schicht die
/// historischen Statuscodes melden kann (fehlende Datei vs. Lesefehler).
pub fn parse_green_grid_file(path: &Path) -> Result<GreenModel, SolveError> {
    if !path.exists() {
        return Err(SolveError::DtmNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Lesefehler: {}", path.display()))
        .map_err(SolveError::DtmRead)?;

    let spacing = spacing_from_filename(path);
    parse_green_grid(&text, spacing).map_err(SolveError::DtmRead)
}

/// Kürzt einen String für Fehlermeldungen auf max. 40 Zeichen.
fn truncate_for_error(s: &str) -> &str {
    match s.char_indices().nth(40) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::DVec2;
    use std::path::PathBuf;

    #[test]
    fn parses_tab_separated_grid() {
        let text = "1.00\t1.05\t1.10\n1.00\t1.05\t1.10\n1.00\t1.05\t1.10\n";
        let green = parse_green_grid(text, 0.2).unwrap();

        assert_eq!(green.dimensions(), (3, 3));
        assert_eq!(green.metadata().data_cells, 9);
        assert_abs_diff_eq!(green.cell(0, 1).unwrap(), 1.05, epsilon = 1e-12);
    }

    #[test]
    fn no_data_markers_are_counted_separately() {
        let text = "-1.000\t1.00\n1.00\t-1.000\n";
        let green = parse_green_grid(text, 0.1).unwrap();

        let meta = green.metadata();
        assert_eq!(meta.data_cells, 2);
        assert_abs_diff_eq!(meta.data_coverage_pct, 50.0, epsilon = 1e-9);
        assert!(green.cell(0, 0).is_none());
        assert!(green.cell(0, 1).is_some());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let text = "1.0\t2.0\t3.0\n1.0\t2.0\n";
        let err = parse_green_grid(text, 0.2).unwrap_err();
        assert!(format!("{err:#}").contains("erwartet"));
    }

    #[test]
    fn garbage_values_are_rejected() {
        let text = "1.0\tabc\n";
        let err = parse_green_grid(text, 0.2).unwrap_err();
        assert!(format!("{err:#}").contains("abc"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse_green_grid("", 0.2).is_err());
        assert!(parse_green_grid("\n\n", 0.2).is_err());
    }

    #[test]
    fn invalid_spacing_is_rejected() {
        assert!(parse_green_grid("1.0\n", 0.0).is_err());
        assert!(parse_green_grid("1.0\n", -0.5).is_err());
    }

    #[test]
    fn spacing_comes_from_filename() {
        assert_abs_diff_eq!(
            spacing_from_filename(&PathBuf::from("Riverside_20cm_Grid.txt")),
            0.2,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            spacing_from_filename(&PathBuf::from("hole7_10CM.txt")),
            0.1,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            spacing_from_filename(&PathBuf::from("green_50cm_v2.txt")),
            0.5,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            spacing_from_filename(&PathBuf::from("mystery_grid.txt")),
            DEFAULT_SPACING_M,
            epsilon = 1e-12
        );
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = parse_green_grid_file(Path::new("/nirgendwo/fehlt_20cm.txt")).unwrap_err();
        assert_eq!(err.status_code(), 2);
    }

    #[test]
    fn parsed_grid_supports_sampling() {
        let text = "1.0\t1.0\t1.0\t1.0\n1.0\t1.0\t1.0\t1.0\n1.0\t1.0\t1.0\t1.0\n1.0\t1.0\t1.0\t1.0\n";
        let green = parse_green_grid(text, 0.2).unwrap();
        let h = green.elevation_at(DVec2::new(0.3, 0.3)).unwrap();
        assert_abs_diff_eq!(h, 1.0, epsilon = 1e-9);
    }
}
