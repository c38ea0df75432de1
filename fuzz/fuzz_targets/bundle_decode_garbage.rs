#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match dechat::Bundle::decode(data) {
        Ok(decoded) => {
            let encoded = decoded.encode().unwrap();

            let redecoded = dechat::Bundle::decode(&encoded).unwrap();
            assert_eq!(decoded, redecoded)
        }
        Err(_) => {
            // ignore errors. We're really looking for panics with this fuzzer
        }
    }
});
