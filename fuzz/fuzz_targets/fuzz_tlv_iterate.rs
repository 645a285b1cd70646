#![no_main]

use libfuzzer_sys::fuzz_target;
use rustchip_core::tlv::{count, find, Tag, TlvReader};

fuzz_target!(|data: &[u8]| {
    let reader = TlvReader::new(data);
    for recurse in [false, true] {
        let _ = count(&reader, recurse);
        if let Ok(Some(found)) = find(&reader, Tag::Context(1), recurse) {
            assert_eq!(found.tag(), Some(Tag::Context(1)));
        }
    }
});
