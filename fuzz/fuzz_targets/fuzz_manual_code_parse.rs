#![no_main]

use libfuzzer_sys::fuzz_target;
use rustchip_setup::{ManualSetupPayloadGenerator, ManualSetupPayloadParser};

fuzz_target!(|data: &[u8]| {
    let Ok(code) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(payload) = ManualSetupPayloadParser::new(code).populate_payload() {
        let regenerated = ManualSetupPayloadGenerator::new(payload)
            .payload_decimal_string_representation()
            .expect("parsed payloads are valid");
        assert_eq!(regenerated, code);
    }
});
