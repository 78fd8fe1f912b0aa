#![no_main]

use libfuzzer_sys::fuzz_target;
use typesys::TypeDatabase;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are expected; panics are not.
        let mut db = TypeDatabase::new();
        let _ = db.parse_str(s, true);
    }
});
