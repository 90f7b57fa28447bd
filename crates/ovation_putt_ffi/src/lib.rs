//! C-ABI-Schicht des Ovation Putt-Solvers.
//!
//! Exportiert die historische DLL-Oberfläche des LabVIEW-Vorgängers
//! (`PuttSolver.h`), damit bestehende Hosts die Bibliothek ohne Anpassung
//! laden können: `DLL_SolveSingle` rechnet einen Putt und schreibt die
//! Anweisung in den Caller-Puffer, `DLL_GetPlotLength`/`DLL_GetPlotData`
//! liefern die Trajektorie des letzten erfolgreichen Solves nach.
//!
//! Der Plot ist prozessweiter Zustand hinter einem Mutex: ein Solve
//! ersetzt ihn atomar, ein fehlgeschlagener Solve leert ihn. Panics
//! werden an der ABI-Grenze gefangen und als Status `-1` gemeldet.

use std::ffi::{CStr, c_char, c_void};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use glam::DVec2;
use ovation_putt_solver::{
    PuttRequest, SolveError, SolverOptions, Stimp, parse_green_grid_file, render_instruction,
    solve_single,
};

/// Trajektorie des letzten erfolgreichen Solves.
static LAST_PLOT: Mutex<Vec<DVec2>> = Mutex::new(Vec::new());

/// Flag des Hosts: VIs laufen im privaten Execution-System.
static PRIVATE_EXECUTION: AtomicBool = AtomicBool::new(false);

/// Statuscodes der historischen DLL-Oberfläche.
mod status {
    pub const OK: i32 = 0;
    pub const INVALID_INPUT: i32 = 1;
    pub const UNKNOWN: i32 = -1;
}

/// Englische Meldung je Statuscode; geht in den Anweisungs-Puffer des Hosts.
fn status_message(code: i32) -> &'static str {
    match code {
        0 => "OK.",
        1 => "Invalid input parameters.",
        2 => "DTM file not found.",
        3 => "DTM file could not be read.",
        4 => "Position outside green data.",
        5 => "Invalid stimp rating.",
        6 => "No converging solution found.",
        8 => "Internal solver error.",
        _ => "Unknown error.",
    }
}

/// Schreibt `text` NUL-terminiert in einen Caller-Puffer.
///
/// Kürzt auf `len - 1` Bytes; bei Null-Zeiger oder `len <= 0` passiert
/// nichts.
///
/// # Safety
///
/// `buf` muss entweder null sein oder auf mindestens `len` beschreibbare
/// Bytes zeigen.
unsafe fn write_c_string(buf: *mut c_char, len: i32, text: &str) {
    if buf.is_null() || len <= 0 {
        return;
    }
    let capacity = (len - 1) as usize;
    let bytes = text.as_bytes();
    let mut copy_len = bytes.len().min(capacity);
    // Nicht mitten in einem Mehrbyte-Zeichen abschneiden (z.B. `°`)
    while copy_len > 0 && !text.is_char_boundary(copy_len) {
        copy_len -= 1;
    }
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), copy_len);
        *buf.add(copy_len) = 0;
    }
}

fn plot_guard() -> std::sync::MutexGuard<'static, Vec<DVec2>> {
    // Ein Panic mit gehaltenem Lock wird an der ABI-Grenze gefangen;
    // der Plot-Vektor bleibt dabei in sich konsistent
    LAST_PLOT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Kern von `DLL_SolveSingle`, in Rust-Typen.
fn solve_and_store(
    hole: DVec2,
    ball: DVec2,
    stimp_ft: f64,
    stimp_in: f64,
    dtm_path: &str,
) -> Result<String, SolveError> {
    let stimp = Stimp::new(stimp_ft, stimp_in)?;
    let green = parse_green_grid_file(std::path::Path::new(dtm_path))?;

    let options = SolverOptions::load_from_file(&SolverOptions::config_path());
    let request = PuttRequest {
        ball,
        cup: hole,
        stimp,
    };
    let solution = solve_single(&green, &request, &options)?;

    let instruction = render_instruction(&solution);
    *plot_guard() = solution.plot;
    Ok(instruction)
}

/// Anzahl Punkte der zuletzt berechneten Trajektorie.
///
/// `0`, solange noch kein Solve gelungen ist.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn DLL_GetPlotLength() -> i32 {
    plot_guard().len() as i32
}

/// Kopiert die zuletzt berechnete Trajektorie in Caller-Puffer.
///
/// Schreibt höchstens `min(len_x, len_y)` Punkte (X nach `plot_x`, Y nach
/// `plot_y`); überzählige Punkte werden abgeschnitten. Hosts rufen vorher
/// `DLL_GetPlotLength` zur Dimensionierung.
///
/// # Safety
///
/// `plot_x`/`plot_y` müssen auf mindestens `len_x` bzw. `len_y`
/// beschreibbare `f64` zeigen oder null sein.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn DLL_GetPlotData(
    plot_x: *mut f64,
    plot_y: *mut f64,
    len_x: i32,
    len_y: i32,
) {
    if plot_x.is_null() || plot_y.is_null() || len_x <= 0 || len_y <= 0 {
        return;
    }

    let plot = plot_guard();
    let count = plot.len().min(len_x.min(len_y) as usize);
    for (i, point) in plot.iter().take(count).enumerate() {
        unsafe {
            *plot_x.add(i) = point.x;
            *plot_y.add(i) = point.y;
        }
    }
}

/// Löst einen einzelnen Putt auf dem DTM unter `dtm_path`.
///
/// Schreibt die Anweisung (bzw. im Fehlerfall eine Statusmeldung)
/// NUL-terminiert nach `instruction` und gibt den Statuscode zurück
/// (`0` = Erfolg, siehe `status_message`). Ein erfolgreicher Solve
/// ersetzt den gespeicherten Plot, ein fehlgeschlagener leert ihn.
///
/// # Safety
///
/// `instruction` muss auf mindestens `instruction_length` beschreibbare
/// Bytes zeigen; `dtm_path` muss ein gültiger NUL-terminierter String
/// sein oder null.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn DLL_SolveSingle(
    hole_x: f64,
    hole_y: f64,
    ball_x: f64,
    ball_y: f64,
    stimp_ft: f64,
    stimp_in: f64,
    instruction: *mut c_char,
    instruction_length: i32,
    dtm_path: *const c_char,
) -> i32 {
    let result = catch_unwind(AssertUnwindSafe(|| {
        if instruction.is_null() || instruction_length <= 0 {
            return status::INVALID_INPUT;
        }
        if dtm_path.is_null() {
            log::warn!("DTM-Pfad ist null");
            unsafe {
                write_c_string(
                    instruction,
                    instruction_length,
                    status_message(status::INVALID_INPUT),
                );
            }
            return status::INVALID_INPUT;
        }

        let path = match unsafe { CStr::from_ptr(dtm_path) }.to_str() {
            Ok(path) => path,
            Err(_) => {
                log::warn!("DTM-Pfad ist kein gueltiges UTF-8");
                unsafe {
                    write_c_string(
                        instruction,
                        instruction_length,
                        status_message(status::INVALID_INPUT),
                    );
                }
                return status::INVALID_INPUT;
            }
        };

        let outcome = solve_and_store(
            DVec2::new(hole_x, hole_y),
            DVec2::new(ball_x, ball_y),
            stimp_ft,
            stimp_in,
            path,
        );
        let (code, text) = match &outcome {
            Ok(instruction_text) => (status::OK, instruction_text.as_str()),
            Err(err) => {
                log::warn!("Solve fehlgeschlagen: {err}");
                plot_guard().clear();
                (err.status_code(), status_message(err.status_code()))
            }
        };
        unsafe { write_c_string(instruction, instruction_length, text) };
        code
    }));

    match result {
        Ok(code) => code,
        Err(_) => {
            log::error!("Panic an der ABI-Grenze gefangen");
            plot_guard().clear();
            unsafe {
                write_c_string(
                    instruction,
                    instruction_length,
                    status_message(status::UNKNOWN),
                );
            }
            status::UNKNOWN
        }
    }
}

/// Load-Status-Hook des LabVIEW-Hosts.
///
/// Meldet immer Erfolg; der Statustext trägt den Bibliotheksnamen samt
/// Version.
///
/// # Safety
///
/// `err_str` muss auf mindestens `err_str_len` beschreibbare Bytes
/// zeigen oder null sein.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn LVDLLStatus(
    err_str: *mut c_char,
    err_str_len: i32,
    _module: *mut c_void,
) -> i32 {
    let text = concat!("ovation_putt_ffi ", env!("CARGO_PKG_VERSION"), " ready");
    unsafe { write_c_string(err_str, err_str_len, text) };
    status::OK
}

/// Übernimmt das Execution-Isolation-Flag des Hosts (Bool32: != 0 = wahr).
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn SetExecuteVIsInPrivateExecutionSystem(value: i32) {
    PRIVATE_EXECUTION.store(value != 0, Ordering::Relaxed);
    log::debug!("Private Execution System: {}", value != 0);
}

/// Aktueller Stand des Execution-Isolation-Flags.
pub fn private_execution_system() -> bool {
    PRIVATE_EXECUTION.load(Ordering::Relaxed)
}
