#![no_main]

use libfuzzer_sys::fuzz_target;
use ovation_putt_solver::parse_green_grid;

// Der Parser darf auf beliebigem Text nicht panicken; Fehler sind ok.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_green_grid(text, 0.2);
    }
});
