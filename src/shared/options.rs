//! Zentrale Konfiguration für den Ovation Putt-Solver.
//!
//! `SolverOptions` enthält alle zur Laufzeit änderbaren Tuning-Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Integration ─────────────────────────────────────────────────────

/// Zeitschritt der Ballroll-Integration in Sekunden.
pub const TIME_STEP_S: f64 = 0.005;
/// Obergrenze der Simulationsdauer pro Lauf in Sekunden.
pub const MAX_SIM_TIME_S: f64 = 30.0;
/// Geschwindigkeit, unterhalb derer der Ball als stehend gilt (m/s).
pub const STOP_SPEED_MPS: f64 = 0.02;

// ── Capture ─────────────────────────────────────────────────────────

/// Maximale Geschwindigkeit, bei der der Cup den Ball noch fängt (m/s).
pub const CAPTURE_SPEED_MPS: f64 = 1.31;

// ── Solver-Suche ────────────────────────────────────────────────────

/// Maximale Anzahl Zielwinkel-Korrekturen pro Tempo-Kandidat.
pub const MAX_AIM_ITERATIONS: u32 = 24;
/// Lateral-Toleranz (m): darunter gilt der Winkel als auskonvergiert.
pub const AIM_TOLERANCE_M: f64 = 0.015;
/// Überroll-Leiter: angepeilte Distanz hinter dem Cup auf ebenem Green (m).
pub const OVERSHOOT_LADDER_M: [f64; 5] = [0.25, 0.45, 0.75, 1.1, 1.6];

// ── Plot ────────────────────────────────────────────────────────────

/// Maximale Punktanzahl des an den Host gemeldeten Trajektorien-Plots.
pub const MAX_PLOT_POINTS: usize = 512;

/// Alle zur Laufzeit änderbaren Solver-Optionen.
/// Wird als `ovation_putt_solver.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverOptions {
    // ── Integration ─────────────────────────────────────────────
    /// Zeitschritt der Integration in Sekunden
    pub time_step_s: f64,
    /// Obergrenze der Simulationsdauer pro Lauf in Sekunden
    pub max_sim_time_s: f64,
    /// Stillstands-Schwelle in m/s
    pub stop_speed_mps: f64,

    // ── Capture ─────────────────────────────────────────────────
    /// Fang-Geschwindigkeit des Cups in m/s
    pub capture_speed_mps: f64,

    // ── Solver-Suche ────────────────────────────────────────────
    /// Maximale Winkel-Korrekturen pro Tempo-Kandidat
    pub max_aim_iterations: u32,
    /// Lateral-Toleranz in Metern
    pub aim_tolerance_m: f64,
    /// Überroll-Leiter in Metern hinter dem Cup
    #[serde(default = "default_overshoot_ladder")]
    pub overshoot_ladder_m: Vec<f64>,

    // ── Plot ────────────────────────────────────────────────────
    /// Maximale Punktanzahl des Plots
    pub max_plot_points: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_step_s: TIME_STEP_S,
            max_sim_time_s: MAX_SIM_TIME_S,
            stop_speed_mps: STOP_SPEED_MPS,
            capture_speed_mps: CAPTURE_SPEED_MPS,
            max_aim_iterations: MAX_AIM_ITERATIONS,
            aim_tolerance_m: AIM_TOLERANCE_M,
            overshoot_ladder_m: OVERSHOOT_LADDER_M.to_vec(),
            max_plot_points: MAX_PLOT_POINTS,
        }
    }
}

/// Serde-Default für `overshoot_ladder_m` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_overshoot_ladder() -> Vec<f64> {
    OVERSHOOT_LADDER_M.to_vec()
}

impl SolverOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Solver-Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Solver-Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("ovation_putt_solver"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("ovation_putt_solver.toml")
    }
}
