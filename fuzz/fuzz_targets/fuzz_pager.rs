#![no_main]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libfuzzer_sys::fuzz_target;
use qiitaz::chrome::ChromeStyle;
use qiitaz::pager::{PagerDocument, PagerEvent, render, transition};

const KEYS: &[KeyCode] = &[
    KeyCode::Char('j'),
    KeyCode::Char('k'),
    KeyCode::Char('g'),
    KeyCode::Char('G'),
    KeyCode::Char('d'),
    KeyCode::Char('u'),
    KeyCode::Char('f'),
    KeyCode::Char('b'),
    KeyCode::Char(' '),
    KeyCode::Down,
    KeyCode::Up,
    KeyCode::PageDown,
    KeyCode::PageUp,
    KeyCode::Home,
    KeyCode::End,
];

fn event(op: u8, arg: u8) -> PagerEvent {
    match op % 4 {
        0 => PagerEvent::Resize(u16::from(arg % 200), u16::from(arg / 2)),
        1 => PagerEvent::Wheel(i32::from(arg as i8)),
        _ => PagerEvent::Key(KeyEvent::new(
            KEYS[usize::from(arg) % KEYS.len()],
            KeyModifiers::NONE,
        )),
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&n, ops)) = data.split_first() else {
        return;
    };
    let content: String = (0..usize::from(n)).map(|i| format!("line {i}\n")).collect();
    let mut doc = PagerDocument::new("fuzz", &content, ChromeStyle::NORMAL);

    for pair in ops.chunks_exact(2) {
        doc = transition(doc, event(pair[0], pair[1]));
        assert!(doc.scroll_offset() <= doc.max_scroll_offset());
        let percent = doc.scroll_percent();
        assert!((0.0..=1.0).contains(&percent));
        let _ = render(&doc);
    }
});
