use std::time::Instant;

use log::info;
use qiitaz::chrome::ChromeStyle;
use qiitaz::markdown::{RenderOptions, render_markdown};
use qiitaz::pager::{PagerDocument, PagerEvent, render, transition};

fn main() {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: reproduce <artifact-file-or-markdown>");
        std::process::exit(1);
    });

    let data = std::fs::read(&path).unwrap_or_else(|e| {
        eprintln!("Failed to read {path}: {e}");
        std::process::exit(1);
    });

    let iterations = std::env::var("ITERATIONS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);
    let width = std::env::var("WIDTH")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(80);

    eprintln!("=== Input: {} ({} bytes), {} iteration(s) ===", path, data.len(), iterations);

    for i in 0..iterations {
        let iter_start = Instant::now();

        let content = match render_markdown(&data, &RenderOptions { width, color: true }) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Render error: {e}");
                std::process::exit(1);
            }
        };

        let mut doc = PagerDocument::new(&path, &content, ChromeStyle::NORMAL);
        doc = transition(doc, PagerEvent::Resize(u16::try_from(width).unwrap_or(u16::MAX), 24));
        while doc.scroll_offset() < doc.max_scroll_offset() {
            doc = transition(doc, PagerEvent::Wheel(24));
            let _ = render(&doc);
        }

        info!(
            "iteration {}: {} lines, total {:.1}ms",
            i,
            doc.total_lines(),
            iter_start.elapsed().as_secs_f64() * 1000.0
        );
    }
}
