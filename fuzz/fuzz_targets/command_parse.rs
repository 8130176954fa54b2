//! Fuzz the terminal command parser.

#![no_main]

use libfuzzer_sys::fuzz_target;
use marquee_cli::commands::{self, Command};

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let command = commands::parse(&line);

    if line.trim().is_empty() {
        assert_eq!(command, Command::Empty);
    }
    if let Command::Add { form } = &command {
        assert!(!form.text.is_empty());
    }
    let _ = command.into_input();
});
