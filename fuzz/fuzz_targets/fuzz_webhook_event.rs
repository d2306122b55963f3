#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = ets::webhook::parse_event(data);

    let verifier = ets::webhook::WebhookVerifier::new("fuzz-secret");
    if let Ok(header) = std::str::from_utf8(data) {
        let _ = verifier.verify(b"{}", header, Some(0));
        let _ = verifier.verify(b"{}", header, None);
    }
});
