//! Textuelle Putt-Anweisung für den Host.
//!
//! Der Text geht unverändert an Anzeige-Clients (Caddie-App, LabVIEW-Host)
//! und bleibt deshalb englisch, im Wortlaut der bisherigen Service-Ausgabe.

use crate::core::solver::PuttSolution;

/// Meilen pro Stunde je m/s.
pub const MPH_PER_MPS: f64 = 2.236_936;

/// Break-Beträge unterhalb dieser Schwelle gelten als gerader Putt (m).
const STRAIGHT_BREAK_THRESHOLD_M: f64 = 0.05;

/// Rendert die Anweisung zu einer Lösung.
///
/// Beispiel: `Aim 2.3° left of the cup, hit with 4.1 mph initial speed.
/// The putt breaks 0.35 m right to left.`
pub fn render_instruction(solution: &PuttSolution) -> String {
    let aim = solution.aim_line_deg;
    let speed_mph = solution.initial_speed_mps * MPH_PER_MPS;

    let mut text = if aim.abs() < 0.05 {
        format!(
            "Aim straight at the cup, hit with {:.1} mph initial speed.",
            speed_mph
        )
    } else {
        let side = if aim < 0.0 { "left" } else { "right" };
        format!(
            "Aim {:.1}\u{b0} {} of the cup, hit with {:.1} mph initial speed.",
            aim.abs(),
            side,
            speed_mph
        )
    };

    if solution.break_m.abs() >= STRAIGHT_BREAK_THRESHOLD_M {
        // break_m positiv = Ball bricht nach links
        let direction = if solution.break_m > 0.0 {
            "right to left"
        } else {
            "left to right"
        };
        text.push_str(&format!(
            " The putt breaks {:.2} m {}.",
            solution.break_m.abs(),
            direction
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(aim_deg: f64, speed_mps: f64, break_m: f64) -> PuttSolution {
        PuttSolution {
            aim_line_deg: aim_deg,
            initial_speed_mps: speed_mps,
            putt_length_m: 3.0,
            break_m,
            plot: Vec::new(),
            attempts: 1,
            duration_s: 2.5,
        }
    }

    #[test]
    fn left_aim_reads_left() {
        let text = render_instruction(&solution(-2.3, 1.85, 0.35));
        assert!(text.contains("2.3\u{b0} left"));
        assert!(text.contains("right to left"));
    }

    #[test]
    fn right_aim_reads_right() {
        let text = render_instruction(&solution(1.8, 1.85, -0.2));
        assert!(text.contains("1.8\u{b0} right"));
        assert!(text.contains("left to right"));
    }

    #[test]
    fn straight_putt_has_no_break_sentence() {
        let text = render_instruction(&solution(0.0, 1.9, 0.01));
        assert!(text.starts_with("Aim straight at the cup"));
        assert!(!text.contains("breaks"));
    }

    #[test]
    fn speed_is_reported_in_mph() {
        let text = render_instruction(&solution(0.0, 2.0, 0.0));
        // 2.0 m/s = 4.5 mph
        assert!(text.contains("4.5 mph"));
    }
}
