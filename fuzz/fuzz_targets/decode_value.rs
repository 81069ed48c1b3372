#![no_main]

use libfuzzer_sys::fuzz_target;
use derval::Mode;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = Mode::Ber.decode(data) {
        let _ = value.to_ber();
        let _ = value.to_der();
    }
    let _ = Mode::Der.decode(data);
});
