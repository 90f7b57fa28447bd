//! Ballroll-Physik über dem Green-Modell.
//!
//! Bewegungsmodell: konstante Rollreibung entgegen der Bewegungsrichtung
//! (aus dem Stimp-Rating) plus Hangabtrieb `-g * ∇h` aus dem
//! Flächengradienten. Integration per semi-implizitem Euler mit festem
//! Zeitschritt; der Schrittweg bleibt damit deutlich unter dem
//! Cup-Radius, Capture-Checks zwischen den Schritten reichen aus.

use glam::DVec2;

use crate::core::green_model::GreenModel;
use crate::shared::SolverOptions;

/// Erdbeschleunigung in m/s².
pub const GRAVITY_MPS2: f64 = 9.81;
/// Cup-Radius (Regulation: 4.25 Zoll Durchmesser) in Metern.
pub const HOLE_RADIUS_M: f64 = 0.054;

/// Wie ein Simulationslauf geendet hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollOutcome {
    /// Ball im Cup gefangen
    Captured,
    /// Ball ausgerollt (Stillstand auf dem Green)
    Stopped,
    /// Ball hat die Green-Daten verlassen
    LeftGreen,
    /// Zeitobergrenze erreicht (z.B. Dauerrollen auf steilem Gefälle)
    TimedOut,
}

/// Nächste Annäherung der Trajektorie an den Cup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    /// Distanz zum Cup-Zentrum in Metern
    pub distance_m: f64,
    /// Ballposition bei der Annäherung
    pub point: DVec2,
    /// Ballgeschwindigkeit bei der Annäherung in m/s
    pub speed_mps: f64,
}

/// Ergebnis eines Simulationslaufs.
#[derive(Debug, Clone)]
pub struct RollPath {
    /// Ballpositionen pro Zeitschritt, Startposition zuerst
    pub path: Vec<DVec2>,
    /// Endzustand des Laufs
    pub outcome: RollOutcome,
    /// Nächste Annäherung an den Cup
    pub closest: ClosestApproach,
    /// Simulierte Dauer in Sekunden
    pub duration_s: f64,
}

/// Simuliert einen Ballroll vom Startpunkt mit Anfangsgeschwindigkeit.
///
/// `friction_decel` ist die Stimp-Verzögerung auf ebenem Green. Der Lauf
/// endet bei Capture, Stillstand, Verlassen der Green-Daten oder
/// Zeitüberschreitung.
pub fn simulate_roll(
    green: &GreenModel,
    start: DVec2,
    velocity: DVec2,
    friction_decel: f64,
    cup: DVec2,
    opts: &SolverOptions,
) -> RollPath {
    let dt = opts.time_step_s;
    let mut pos = start;
    let mut vel = velocity;
    let mut t = 0.0;

    let mut path = vec![pos];
    let mut closest = ClosestApproach {
        distance_m: pos.distance(cup),
        point: pos,
        speed_mps: vel.length(),
    };

    let outcome = loop {
        let Some(grad) = green.gradient_at(pos) else {
            break RollOutcome::LeftGreen;
        };

        let speed = vel.length();
        let cup_distance = pos.distance(cup);
        if cup_distance < closest.distance_m {
            closest = ClosestApproach {
                distance_m: cup_distance,
                point: pos,
                speed_mps: speed,
            };
        }

        if cup_distance < HOLE_RADIUS_M && speed <= opts.capture_speed_mps {
            break RollOutcome::Captured;
        }

        // Haftreibung: steht der Ball und hält die Reibung den Hangabtrieb,
        // bleibt er liegen
        let downhill_pull = GRAVITY_MPS2 * grad.length();
        if speed < opts.stop_speed_mps.max(friction_decel * dt) && downhill_pull <= friction_decel {
            break RollOutcome::Stopped;
        }

        if t >= opts.max_sim_time_s {
            break RollOutcome::TimedOut;
        }

        let mut accel = -GRAVITY_MPS2 * grad;
        if speed > 1e-9 {
            accel -= friction_decel * (vel / speed);
        }

        vel += accel * dt;
        pos += vel * dt;
        t += dt;
        path.push(pos);
    };

    RollPath {
        path,
        outcome,
        closest,
        duration_s: t,
    }
}

/// Dünnt einen Pfad auf höchstens `max_points` Punkte aus.
///
/// Der letzte Punkt bleibt immer erhalten, damit das Plot-Ende der
/// tatsächlichen Endposition entspricht.
pub fn decimate_path(path: &[DVec2], max_points: usize) -> Vec<DVec2> {
    if max_points == 0 || path.is_empty() {
        return Vec::new();
    }
    if path.len() <= max_points {
        return path.to_vec();
    }

    let stride = path.len().div_ceil(max_points);
    let mut result: Vec<DVec2> = path.iter().step_by(stride).copied().collect();
    let last = *path.last().expect("Pfad ist nicht leer");
    if result.last() != Some(&last) {
        if result.len() >= max_points {
            result.pop();
        }
        result.push(last);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::green_model::GreenModel;
    use crate::core::stimp::{Stimp, STIMP_RELEASE_SPEED_MPS};
    use approx::assert_abs_diff_eq;

    fn flat_grid(rows: usize, cols: usize) -> GreenModel {
        GreenModel::new(vec![1.0; rows * cols], rows, cols, 0.2)
    }

    /// h = slope * x (Anstieg in +x)
    fn tilted_grid(rows: usize, cols: usize, slope: f64) -> GreenModel {
        let spacing = 0.2;
        let mut cells = Vec::with_capacity(rows * cols);
        for _row in 0..rows {
            for col in 0..cols {
                cells.push(slope * col as f64 * spacing);
            }
        }
        GreenModel::new(cells, rows, cols, spacing)
    }

    fn far_cup() -> DVec2 {
        DVec2::new(500.0, 500.0)
    }

    #[test]
    fn flat_roll_matches_stimp_distance() {
        let green = flat_grid(40, 40);
        let stimp = Stimp::new(10.0, 0.0).unwrap();
        let opts = SolverOptions::default();

        let start = DVec2::new(1.0, 3.0);
        let v0 = DVec2::new(STIMP_RELEASE_SPEED_MPS, 0.0);
        let roll = simulate_roll(&green, start, v0, stimp.friction_decel_mps2(), far_cup(), &opts);

        assert_eq!(roll.outcome, RollOutcome::Stopped);
        let end = *roll.path.last().unwrap();
        // Stimp 10 = 3.048 m Rolldistanz (Diskretisierungsfehler ~v0*dt/2)
        assert_abs_diff_eq!(end.x - start.x, 3.048, epsilon = 0.05);
        assert_abs_diff_eq!(end.y, start.y, epsilon = 1e-9);
    }

    #[test]
    fn ball_at_rest_on_mild_slope_stays_put() {
        // g * 0.05 = 0.49 m/s² < Stimp-10-Reibung 0.549 m/s²
        let green = tilted_grid(40, 40, 0.05);
        let stimp = Stimp::new(10.0, 0.0).unwrap();
        let opts = SolverOptions::default();

        let roll = simulate_roll(
            &green,
            DVec2::new(4.0, 4.0),
            DVec2::ZERO,
            stimp.friction_decel_mps2(),
            far_cup(),
            &opts,
        );

        assert_eq!(roll.outcome, RollOutcome::Stopped);
        assert!(roll.duration_s < 0.1);
    }

    #[test]
    fn cross_slope_bends_the_path_downhill() {
        let green = tilted_grid(60, 60, 0.03);
        let stimp = Stimp::new(11.0, 0.0).unwrap();
        let opts = SolverOptions::default();

        // Putt entlang +y, Gefälle Richtung -x
        let start = DVec2::new(6.0, 2.0);
        let roll = simulate_roll(
            &green,
            start,
            DVec2::new(0.0, 2.0),
            stimp.friction_decel_mps2(),
            far_cup(),
            &opts,
        );

        assert_eq!(roll.outcome, RollOutcome::Stopped);
        let end = *roll.path.last().unwrap();
        assert!(end.y > start.y + 1.0, "Ball muss vorwaerts rollen");
        assert!(end.x < start.x - 0.05, "Ball muss talwaerts driften");
    }

    #[test]
    fn slow_ball_over_the_cup_is_captured() {
        let green = flat_grid(40, 40);
        let stimp = Stimp::new(10.0, 0.0).unwrap();
        let opts = SolverOptions::default();
        let a = stimp.friction_decel_mps2();

        let start = DVec2::new(1.0, 4.0);
        let cup = DVec2::new(3.0, 4.0);
        // Tempo fuer 0.3 m Ueberrollen auf ebenem Green
        let v0 = (2.0 * a * (2.0 + 0.3)).sqrt();

        let roll = simulate_roll(&green, start, DVec2::new(v0, 0.0), a, cup, &opts);

        assert_eq!(roll.outcome, RollOutcome::Captured);
        assert!(roll.closest.distance_m < HOLE_RADIUS_M);
        let end = *roll.path.last().unwrap();
        assert!(end.distance(cup) < 0.1);
    }

    #[test]
    fn fast_ball_runs_over_the_cup() {
        let green = flat_grid(40, 40);
        let opts = SolverOptions::default();
        let a = 0.549;

        let start = DVec2::new(1.0, 4.0);
        let cup = DVec2::new(2.0, 4.0);
        // Weit ueber der Capture-Geschwindigkeit am Cup
        let roll = simulate_roll(&green, start, DVec2::new(2.2, 0.0), a, cup, &opts);

        assert_eq!(roll.outcome, RollOutcome::Stopped);
        assert!(roll.closest.distance_m < HOLE_RADIUS_M);
        let end = *roll.path.last().unwrap();
        assert!(end.x > cup.x + 1.0, "Ball muss am Cup vorbeirollen");
    }

    #[test]
    fn leaving_the_grid_ends_the_roll() {
        let green = flat_grid(10, 10); // 1.8 m Kante
        let opts = SolverOptions::default();

        let roll = simulate_roll(
            &green,
            DVec2::new(0.9, 0.9),
            DVec2::new(2.0, 0.0),
            0.549,
            far_cup(),
            &opts,
        );

        assert_eq!(roll.outcome, RollOutcome::LeftGreen);
    }

    #[test]
    fn decimation_keeps_endpoints_and_bound() {
        let path: Vec<DVec2> = (0..1000).map(|i| DVec2::new(i as f64, 0.0)).collect();
        let thin = decimate_path(&path, 64);

        assert!(thin.len() <= 64);
        assert_eq!(thin.first(), path.first());
        assert_eq!(thin.last(), path.last());

        let short = decimate_path(&path[..10], 64);
        assert_eq!(short.len(), 10);
    }
}
