#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(iban) = ets::validate_iban(s) {
            // Normalized output validates to itself, grouped or not.
            assert_eq!(ets::validate_iban(&iban).as_deref(), Ok(iban.as_str()));
            assert_eq!(ets::validate_iban(&ets::format_iban(&iban)), Ok(iban));
        }
    }
});
