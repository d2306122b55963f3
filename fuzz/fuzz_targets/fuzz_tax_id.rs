#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let vkn = ets::validate_vkn(s);
        let tckn = ets::validate_tckn(s);
        // A string can never be both a valid VKN and a valid TCKN.
        assert!(!(vkn.is_ok() && tckn.is_ok()));
        if let Ok(id) = ets::validate_tax_id(s) {
            assert_eq!(id.as_str(), s.trim());
        }
    }
});
