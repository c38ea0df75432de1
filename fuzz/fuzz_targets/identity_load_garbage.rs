#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(serialized) = dechat::SerializedIdentity::from_json(json) {
        // only a genuine key encrypted under this password may load
        let _ = dechat::KeyIdentity::load(&serialized, "password");
    }
});
