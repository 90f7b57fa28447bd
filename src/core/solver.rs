//! Putt-Löser: sucht Zielwinkel und Anfangstempo für einen lochbaren Putt.
//!
//! Suchstrategie in zwei Ebenen:
//! 1. Eine Überroll-Leiter liefert Tempo-Kandidaten. Das Anfangstempo wird
//!    aus der Stimp-Reibung plus der Höhendifferenz Ball→Cup geschätzt
//!    (Energieansatz), damit auch Bergauf-Putts genug Tempo bekommen.
//! 2. Pro Tempo wird der Zielwinkel iterativ korrigiert: simulieren, den
//!    seitlichen Versatz der nächsten Cup-Annäherung messen, Winkel um
//!    `atan(Versatz / Puttlänge)` nachführen. Die Sensitivität des
//!    Versatzes entspricht etwa der Puttlänge, die Korrektur konvergiert
//!    dadurch in wenigen Iterationen.
//!
//! Der erste Lauf, den der Cup fängt, ist die Lösung.

use glam::DVec2;
use serde::Serialize;

use crate::core::green_model::GreenModel;
use crate::core::physics::{decimate_path, simulate_roll, RollOutcome, GRAVITY_MPS2};
use crate::core::stimp::Stimp;
use crate::error::SolveError;
use crate::shared::SolverOptions;

/// Mindestdistanz Ball→Cup in Metern; darunter ist nichts zu lösen.
const MIN_PUTT_LENGTH_M: f64 = 0.05;

/// Eingaben eines einzelnen Putts in Green-lokalen Metern.
#[derive(Debug, Clone, Copy)]
pub struct PuttRequest {
    /// Ballposition
    pub ball: DVec2,
    /// Cup-Position
    pub cup: DVec2,
    /// Green-Geschwindigkeit
    pub stimp: Stimp,
}

/// Gelöster Putt mit Empfehlung und Trajektorie.
#[derive(Debug, Clone, Serialize)]
pub struct PuttSolution {
    /// Zielwinkel relativ zur direkten Ball→Cup-Linie in Grad
    /// (negativ = links am Cup vorbei zielen)
    pub aim_line_deg: f64,
    /// Anfangsgeschwindigkeit des Balls in m/s
    pub initial_speed_mps: f64,
    /// Direkte Distanz Ball→Cup in Metern
    pub putt_length_m: f64,
    /// Maximale seitliche Abweichung der Trajektorie von der direkten
    /// Linie in Metern (positiv = Ball bricht nach links)
    pub break_m: f64,
    /// Ausgedünnte Trajektorie, Start bei der Ballposition
    pub plot: Vec<DVec2>,
    /// Anzahl benötigter Simulationsläufe
    pub attempts: u32,
    /// Rolldauer der Lösung in Sekunden
    pub duration_s: f64,
}

/// Löst einen einzelnen Putt.
pub fn solve_single(
    green: &GreenModel,
    request: &PuttRequest,
    opts: &SolverOptions,
) -> Result<PuttSolution, SolveError> {
    let ball = request.ball;
    let cup = request.cup;

    if !ball.is_finite() || !cup.is_finite() {
        return Err(SolveError::InvalidInput(
            "Ball- oder Cup-Koordinaten sind nicht endlich".into(),
        ));
    }

    let ball_height = green
        .elevation_at(ball)
        .ok_or(SolveError::OutOfGreen {
            label: "ball",
            position: ball,
        })?;
    let cup_height = green.elevation_at(cup).ok_or(SolveError::OutOfGreen {
        label: "cup",
        position: cup,
    })?;

    let putt_length = ball.distance(cup);
    if putt_length < MIN_PUTT_LENGTH_M {
        return Err(SolveError::InvalidInput(format!(
            "Ball liegt bereits am Cup (Distanz {putt_length:.3} m)"
        )));
    }

    let direct_dir = (cup - ball) / putt_length;
    let friction = request.stimp.friction_decel_mps2();
    let climb = cup_height - ball_height;

    let mut attempts = 0u32;
    // Winkel über die Leiter hinweg mitnehmen: der Break ändert sich mit
    // dem Tempo nur moderat, der Vorgänger ist ein guter Startwert
    let mut aim_rad = 0.0f64;

    for &overshoot in &opts.overshoot_ladder_m {
        // Energieansatz: Reibung über die Zieldistanz plus Höhendifferenz
        let v0_sq = 2.0 * friction * (putt_length + overshoot) + 2.0 * GRAVITY_MPS2 * climb;
        let v0 = v0_sq.max(2.0 * friction * MIN_PUTT_LENGTH_M).sqrt();

        for _ in 0..opts.max_aim_iterations {
            attempts += 1;
            let launch_dir = rotate_ccw(direct_dir, aim_rad);
            let roll = simulate_roll(green, ball, launch_dir * v0, friction, cup, opts);

            if roll.outcome == RollOutcome::Captured {
                let break_m = max_lateral_deviation(&roll.path, ball, direct_dir);
                log::info!(
                    "Putt geloest: {:.2} m, Winkel {:.2} Grad, Tempo {:.2} m/s, {} Laeufe",
                    putt_length,
                    -aim_rad.to_degrees(),
                    v0,
                    attempts
                );
                return Ok(PuttSolution {
                    aim_line_deg: -aim_rad.to_degrees(),
                    initial_speed_mps: v0,
                    putt_length_m: putt_length,
                    break_m,
                    plot: decimate_path(&roll.path, opts.max_plot_points),
                    attempts,
                    duration_s: roll.duration_s,
                });
            }

            // Seitlicher Versatz der nächsten Annäherung (positiv = links)
            let miss = direct_dir.perp_dot(roll.closest.point - cup);
            if miss.abs() < opts.aim_tolerance_m {
                // Linie stimmt, das Tempo passt nicht: nächste Leiterstufe
                break;
            }
            aim_rad -= (miss / putt_length).atan();
        }
    }

    log::warn!(
        "Keine Loesung: {:.2} m Putt bei Stimp {:.1} nach {} Laeufen",
        putt_length,
        request.stimp.total_feet(),
        attempts
    );
    Err(SolveError::NoConvergence { attempts })
}

/// Rotiert einen Vektor um `angle_rad` gegen den Uhrzeigersinn.
fn rotate_ccw(v: DVec2, angle_rad: f64) -> DVec2 {
    let (sin, cos) = angle_rad.sin_cos();
    DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Betragsmaximale signierte Abweichung des Pfads von der direkten Linie.
fn max_lateral_deviation(path: &[DVec2], ball: DVec2, direct_dir: DVec2) -> f64 {
    let mut extreme = 0.0f64;
    for &p in path {
        let lateral = direct_dir.perp_dot(p - ball);
        if lateral.abs() > extreme.abs() {
            extreme = lateral;
        }
    }
    extreme
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::green_model::{GreenModel, NO_DATA};
    use approx::assert_abs_diff_eq;

    fn flat_grid(rows: usize, cols: usize) -> GreenModel {
        GreenModel::new(vec![0.5; rows * cols], rows, cols, 0.2)
    }

    /// h = slope * x
    fn x_tilted_grid(rows: usize, cols: usize, slope: f64) -> GreenModel {
        let spacing = 0.2;
        let mut cells = Vec::with_capacity(rows * cols);
        for _row in 0..rows {
            for col in 0..cols {
                cells.push(slope * col as f64 * spacing);
            }
        }
        GreenModel::new(cells, rows, cols, spacing)
    }

    fn request(ball: DVec2, cup: DVec2, stimp_ft: f64) -> PuttRequest {
        PuttRequest {
            ball,
            cup,
            stimp: Stimp::new(stimp_ft, 0.0).unwrap(),
        }
    }

    #[test]
    fn straight_putt_on_flat_green() {
        let green = flat_grid(40, 40);
        let req = request(DVec2::new(2.0, 5.0), DVec2::new(5.0, 5.0), 10.0);

        let solution = solve_single(&green, &req, &SolverOptions::default()).unwrap();

        assert!(solution.aim_line_deg.abs() < 0.5, "flacher Putt ist gerade");
        assert_abs_diff_eq!(solution.putt_length_m, 3.0, epsilon = 1e-9);
        // Tempo fuer 3 m + erste Leiterstufe bei Stimp 10
        assert_abs_diff_eq!(solution.initial_speed_mps, 1.89, epsilon = 0.05);
        assert!(solution.break_m.abs() < 0.05);

        let first = *solution.plot.first().unwrap();
        let last = *solution.plot.last().unwrap();
        assert!(first.distance(req.ball) < 1e-9);
        assert!(last.distance(req.cup) < 0.1);
    }

    #[test]
    fn cross_slope_putt_aims_uphill() {
        // Gefälle Richtung -x, Putt entlang +y: Ball bricht nach links,
        // gezielt wird rechts (positives aim_line_deg)
        let green = x_tilted_grid(60, 60, 0.02);
        let req = request(DVec2::new(6.0, 2.0), DVec2::new(6.0, 6.0), 10.0);

        let solution = solve_single(&green, &req, &SolverOptions::default()).unwrap();

        assert!(
            solution.aim_line_deg > 0.3,
            "Zielwinkel muss bergauf zeigen, war {:.2}",
            solution.aim_line_deg
        );
        assert!(solution.break_m > 0.02, "Break nach links erwartet");

        let last = *solution.plot.last().unwrap();
        assert!(last.distance(req.cup) < 0.1);
    }

    #[test]
    fn uphill_putt_gets_extra_speed() {
        // Anstieg in +y, Putt bergauf
        let spacing = 0.2;
        let rows = 60;
        let cols = 60;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for _col in 0..cols {
                cells.push(0.025 * row as f64 * spacing);
            }
        }
        let green = GreenModel::new(cells, rows, cols, spacing);

        let flat = flat_grid(60, 60);
        let ball = DVec2::new(5.0, 2.0);
        let cup = DVec2::new(5.0, 6.0);

        let uphill = solve_single(&green, &request(ball, cup, 10.0), &SolverOptions::default())
            .expect("Bergauf-Putt ist loesbar");
        let level = solve_single(&flat, &request(ball, cup, 10.0), &SolverOptions::default())
            .expect("flacher Putt ist loesbar");

        assert!(uphill.initial_speed_mps > level.initial_speed_mps + 0.1);
    }

    #[test]
    fn hopeless_putt_reports_no_convergence() {
        // Stimp 0.5: extreme Reibung, der Ball kommt nie langsam genug
        // am Cup an (Arrival-Tempo liegt immer ueber der Fang-Schwelle)
        let green = flat_grid(60, 60);
        let req = request(DVec2::new(2.0, 5.0), DVec2::new(8.0, 5.0), 0.5);

        let err = solve_single(&green, &req, &SolverOptions::default()).unwrap_err();
        match err {
            SolveError::NoConvergence { attempts } => assert!(attempts > 0),
            other => panic!("NoConvergence erwartet, war {other:?}"),
        }
    }

    #[test]
    fn ball_outside_green_data_is_rejected() {
        let mut cells = vec![0.5; 1600];
        for r in 0..4usize {
            for c in 0..4usize {
                cells[r * 40 + c] = NO_DATA;
            }
        }
        let green = GreenModel::new(cells, 40, 40, 0.2);

        let req = request(DVec2::new(0.2, 0.2), DVec2::new(5.0, 5.0), 10.0);
        let err = solve_single(&green, &req, &SolverOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SolveError::OutOfGreen { label: "ball", .. }
        ));

        let req = request(DVec2::new(5.0, 5.0), DVec2::new(-3.0, 1.0), 10.0);
        let err = solve_single(&green, &req, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, SolveError::OutOfGreen { label: "cup", .. }));
    }

    #[test]
    fn ball_on_the_cup_is_invalid_input() {
        let green = flat_grid(40, 40);
        let req = request(DVec2::new(3.0, 3.0), DVec2::new(3.01, 3.0), 10.0);

        let err = solve_single(&green, &req, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, SolveError::InvalidInput(_)));
    }
}
