//! Fuzz overlay form validation with arbitrary field text.
//!
//! Accepted forms must describe a drawable overlay: non-blank text and a
//! rectangle with positive extent.

#![no_main]

use libfuzzer_sys::fuzz_target;
use marquee_core::OverlayForm;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let mut fields = input.splitn(5, '\n');
    let mut next = || fields.next().unwrap_or_default().to_string();
    let form = OverlayForm { top: next(), left: next(), width: next(), height: next(), text: next() };

    if let Ok(parsed) = form.parse() {
        assert!(!parsed.text.trim().is_empty());
        assert_eq!(parsed.text, form.text);
        assert!(parsed.size.width > 0 && parsed.size.height > 0);
    }
});
