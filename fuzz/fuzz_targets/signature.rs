#![no_main]

use libfuzzer_sys::fuzz_target;
use typesys_syntax::signature;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalized = signature::normalized_signature(s);
        let _ = signature::parse_function(&normalized, "void", 0.0);
        let _ = signature::parse_type(s);
    }
});
