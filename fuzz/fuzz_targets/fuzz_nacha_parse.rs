#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic. Errors are fine, panics are bugs.
        if let Ok(file) = achfile::nacha::parse_nacha(s) {
            let _ = file.verify();
            let _ = file.record_count();
        }
    }
});
