#![no_main]

use libfuzzer_sys::fuzz_target;
use derval::Value;

fuzz_target!(|data: &[u8]| {
    // Whatever decodes as DER must re-encode to the exact input.
    if let Ok(value) = Value::from_der(data) {
        assert_eq!(value.to_der().as_ref(), data);
        assert_eq!(Value::from_der(data).unwrap(), value);
    }
});
