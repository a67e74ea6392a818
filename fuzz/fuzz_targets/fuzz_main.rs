// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use mkdown_core::{normalize, sniff_title, Backend, ComrakBackend, PulldownBackend, RawOptions};

fuzz_target!(|data: &[u8]| {
    let _ = sniff_title(data);

    // First byte picks the flags, the rest is the document
    let Some((&flags, input)) = data.split_first() else {
        return;
    };
    let raw = RawOptions {
        toc: flags & 0x01 != 0,
        toc_only: flags & 0x02 != 0,
        page: flags & 0x04 != 0,
        smartypants: flags & 0x08 != 0,
        latexdashes: flags & 0x10 != 0,
        fractions: flags & 0x20 != 0,
        html_simple: flags & 0x40 != 0,
        ..RawOptions::default()
    };
    let config = normalize(&raw);
    assert_eq!(config.clone().normalized(), config);

    let _ = ComrakBackend::new().render(input, &config);
    let _ = PulldownBackend::new().render(input, &config);
});
