#![no_main]

use libfuzzer_sys::fuzz_target;
use qiitaz::markdown::{RenderOptions, render_markdown};

fuzz_target!(|data: &[u8]| {
    // First byte picks the width so narrow layouts get exercised too.
    let Some((&w, body)) = data.split_first() else {
        return;
    };
    let width = usize::from(w % 120) + 1;

    let plain = RenderOptions { width, color: false };
    let Ok(out) = render_markdown(body, &plain) else {
        // Only invalid UTF-8 may fail.
        assert!(std::str::from_utf8(body).is_err());
        return;
    };

    // Styling must not change the line structure.
    let colored = render_markdown(body, &RenderOptions { width, color: true })
        .expect("valid UTF-8 renders in color too");
    assert_eq!(out.lines().count(), colored.lines().count());
});
