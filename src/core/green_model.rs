//! Green-Modell: Elevationsgrid und Höhen-Sampling.
//!
//! Das Grid kommt zeilenweise aus einer DTM-Datei (siehe `crate::grid`).
//! Zellen mit dem No-Data-Marker liegen außerhalb des Greens. Höhenwerte
//! zwischen den Stützstellen werden bikubisch interpoliert (Catmull-Rom),
//! damit Gradienten für die Ballroll-Physik glatt bleiben.

use glam::DVec2;

/// Markerwert für Zellen ohne Daten (außerhalb des Greens).
pub const NO_DATA: f64 = -1.0;

/// Metadaten eines geparsten Elevationsgrids.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetadata {
    /// Zeilenanzahl des Grids
    pub rows: usize,
    /// Spaltenanzahl des Grids
    pub cols: usize,
    /// Zellabstand in Metern
    pub spacing_m: f64,
    /// Kleinste Elevation mit Daten (None bei leerem Green)
    pub elevation_min: Option<f64>,
    /// Größte Elevation mit Daten
    pub elevation_max: Option<f64>,
    /// Anzahl Zellen mit Daten
    pub data_cells: usize,
    /// Anteil Zellen mit Daten in Prozent
    pub data_coverage_pct: f64,
}

impl GridMetadata {
    /// Geschätzte Green-Größe (Breite, Tiefe) in Metern.
    pub fn green_size_m(&self) -> (f64, f64) {
        (
            self.cols as f64 * self.spacing_m,
            self.rows as f64 * self.spacing_m,
        )
    }
}

/// Elevationsgrid eines Greens in Green-lokalen Metern.
///
/// Koordinatenkonvention: `x = spalte * spacing`, `y = zeile * spacing`,
/// Ursprung an Zelle (0, 0).
#[derive(Debug, Clone)]
pub struct GreenModel {
    /// Elevationswerte in Metern, zeilenweise gespeichert (`NO_DATA` = leer)
    cells: Vec<f64>,
    rows: usize,
    cols: usize,
    spacing_m: f64,
    metadata: GridMetadata,
}

impl GreenModel {
    /// Baut ein Green-Modell aus zeilenweisen Elevationswerten.
    ///
    /// Erwartet ein rechteckiges Grid; Metadaten (Range, Coverage) werden
    /// beim Bau einmalig berechnet.
    pub fn new(cells: Vec<f64>, rows: usize, cols: usize, spacing_m: f64) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);

        let mut elevation_min: Option<f64> = None;
        let mut elevation_max: Option<f64> = None;
        let mut data_cells = 0usize;
        for &value in &cells {
            if value == NO_DATA {
                continue;
            }
            data_cells += 1;
            elevation_min = Some(elevation_min.map_or(value, |m: f64| m.min(value)));
            elevation_max = Some(elevation_max.map_or(value, |m: f64| m.max(value)));
        }

        let total = rows * cols;
        let data_coverage_pct = if total > 0 {
            data_cells as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let metadata = GridMetadata {
            rows,
            cols,
            spacing_m,
            elevation_min,
            elevation_max,
            data_cells,
            data_coverage_pct,
        };

        Self {
            cells,
            rows,
            cols,
            spacing_m,
            metadata,
        }
    }

    /// Metadaten des Grids.
    pub fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    /// Grid-Dimensionen (Zeilen, Spalten).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Zellabstand in Metern.
    pub fn spacing_m(&self) -> f64 {
        self.spacing_m
    }

    /// Gibt `true` zurück, wenn mindestens eine Zelle Daten trägt.
    pub fn has_data(&self) -> bool {
        self.metadata.data_cells > 0
    }

    /// Roh-Zellwert an (row, col); `None` bei No-Data oder außerhalb.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let value = self.cells[row * self.cols + col];
        (value != NO_DATA).then_some(value)
    }

    /// Zellwert mit an die Grid-Ränder geklemmten Indizes.
    fn cell_clamped(&self, row: i64, col: i64) -> f64 {
        let r = row.clamp(0, self.rows as i64 - 1) as usize;
        let c = col.clamp(0, self.cols as i64 - 1) as usize;
        self.cells[r * self.cols + c]
    }

    /// Prüft, ob die Position innerhalb des Grid-Rechtecks liegt.
    pub fn in_bounds(&self, position: DVec2) -> bool {
        let max_x = (self.cols - 1) as f64 * self.spacing_m;
        let max_y = (self.rows - 1) as f64 * self.spacing_m;
        position.x >= 0.0 && position.y >= 0.0 && position.x <= max_x && position.y <= max_y
    }

    /// Interpolierte Elevation an einer Green-lokalen Position.
    ///
    /// Bikubisch über ein 4×4-Fenster (Catmull-Rom). Gibt `None` zurück,
    /// wenn die Position außerhalb des Grids liegt oder eine der vier
    /// umschließenden Zellen No-Data ist (Ball wäre neben dem Green).
    /// No-Data-Werte im äußeren Fensterring werden durch den nächsten
    /// gültigen Zentralwert ersetzt, damit die Fläche am Green-Rand
    /// stetig bleibt.
    pub fn elevation_at(&self, position: DVec2) -> Option<f64> {
        if !self.in_bounds(position) {
            return None;
        }

        let px = position.x / self.spacing_m;
        let py = position.y / self.spacing_m;

        let col = px.floor() as i64;
        let row = py.floor() as i64;
        let fx = px - px.floor();
        let fy = py - py.floor();

        // Die vier umschließenden Zellen müssen Daten tragen
        let mut center_sum = 0.0;
        let mut center_count = 0.0;
        for dr in 0..2 {
            for dc in 0..2 {
                let value = self.cell_clamped(row + dr, col + dc);
                if value == NO_DATA {
                    return None;
                }
                center_sum += value;
                center_count += 1.0;
            }
        }
        let center_mean = center_sum / center_count;

        // 4×4-Fenster einsammeln, No-Data im Außenring neutralisieren
        let mut window = [[0.0f64; 4]; 4];
        for (j, window_row) in window.iter_mut().enumerate() {
            for (i, cell) in window_row.iter_mut().enumerate() {
                let value = self.cell_clamped(row + j as i64 - 1, col + i as i64 - 1);
                *cell = if value == NO_DATA { center_mean } else { value };
            }
        }

        let mut column_values = [0.0f64; 4];
        for j in 0..4 {
            column_values[j] = cubic_interpolate(
                window[j][0],
                window[j][1],
                window[j][2],
                window[j][3],
                fx,
            );
        }

        Some(cubic_interpolate(
            column_values[0],
            column_values[1],
            column_values[2],
            column_values[3],
            fy,
        ))
    }

    /// Flächengradient (∂h/∂x, ∂h/∂y) an einer Position.
    ///
    /// Zentrale Differenzen mit Schrittweite = Zellabstand; fällt am
    /// Green-Rand auf einseitige Differenzen zurück. Außerhalb der
    /// Daten: `None`.
    pub fn gradient_at(&self, position: DVec2) -> Option<DVec2> {
        let center = self.elevation_at(position)?;
        let h = self.spacing_m;

        let gx = self.directional_difference(position, DVec2::new(h, 0.0), center);
        let gy = self.directional_difference(position, DVec2::new(0.0, h), center);

        Some(DVec2::new(gx, gy))
    }

    fn directional_difference(&self, position: DVec2, step: DVec2, center: f64) -> f64 {
        let h = step.length();
        let forward = self.elevation_at(position + step);
        let backward = self.elevation_at(position - step);

        match (forward, backward) {
            (Some(f), Some(b)) => (f - b) / (2.0 * h),
            (Some(f), None) => (f - center) / h,
            (None, Some(b)) => (center - b) / h,
            (None, None) => 0.0,
        }
    }
}

/// Kubische Catmull-Rom-Interpolation zwischen vier Stützwerten.
fn cubic_interpolate(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}
