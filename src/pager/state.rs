//! Pager state machine: a pure `transition` and a pure `render`.
//!
//! ```text
//! Uninitialized --Resize--> Ready --Resize--> Ready
//!       |                     |
//!       +------- quit --------+--> finished (absorbing)
//! ```

use crossterm::event::KeyEvent;
use log::debug;

use super::input::{Action, map_key_event};
use super::viewport::Viewport;
use crate::chrome::{self, ChromeStyle};
use crate::sanitize::single_line;

const PLACEHOLDER: &str = "\n  Initializing...";

/// Input to [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerEvent {
    Key(KeyEvent),
    /// New terminal size `(columns, rows)`.
    Resize(u16, u16),
    /// Mouse wheel; positive scrolls down. Already scaled to lines.
    Wheel(i32),
    Quit,
}

/// Everything one pager session shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PagerDocument {
    pub title: String,
    pub style: ChromeStyle,
    viewport: Viewport,
    header_height: usize,
    footer_height: usize,
    ready: bool,
    finished: bool,
}

impl PagerDocument {
    pub fn new(title: &str, content: &str, style: ChromeStyle) -> Self {
        Self {
            title: single_line(title),
            style,
            viewport: Viewport::new(content),
            header_height: 0,
            footer_height: 0,
            ready: false,
            finished: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn scroll_offset(&self) -> usize {
        self.viewport.offset()
    }

    pub fn max_scroll_offset(&self) -> usize {
        self.viewport.max_offset()
    }

    pub fn total_lines(&self) -> usize {
        self.viewport.total_lines()
    }

    pub fn visible_lines(&self) -> usize {
        self.viewport.height()
    }

    pub fn scroll_percent(&self) -> f64 {
        chrome::scroll_percent(
            self.viewport.offset(),
            self.viewport.total_lines(),
            self.viewport.height(),
        )
    }

    fn header(&self) -> String {
        chrome::render_header(&self.title, self.viewport.width(), &self.style)
    }

    fn footer(&self) -> String {
        chrome::render_footer(self.scroll_percent(), self.viewport.width(), &self.style)
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let width = usize::from(cols);
        // Chrome width depends on the viewport width, so size it first.
        self.viewport.set_size(width, self.viewport.height());
        self.header_height = chrome::height(&self.header());
        self.footer_height = chrome::height(&self.footer());
        let visible = usize::from(rows).saturating_sub(self.header_height + self.footer_height);
        self.viewport.set_size(width, visible);
        if !self.ready {
            debug!("pager: ready at {cols}x{rows} ({visible} visible rows)");
        }
        self.ready = true;
    }

    fn apply(&mut self, action: Action) {
        let vp = &mut self.viewport;
        match action {
            Action::Quit => self.finished = true,
            Action::JumpToTop => vp.goto_top(),
            Action::JumpToBottom => vp.goto_bottom(),
            Action::LineDown => vp.scroll_down(1),
            Action::LineUp => vp.scroll_up(1),
            Action::PageDown => vp.page_down(),
            Action::PageUp => vp.page_up(),
            Action::HalfPageDown => vp.half_page_down(),
            Action::HalfPageUp => vp.half_page_up(),
        }
    }
}

/// Advance `doc` by one event.
///
/// Sizing applies in both phases; quitting works in both phases; every other
/// event is ignored until the first sizing event. A finished document never
/// changes again.
pub fn transition(mut doc: PagerDocument, event: PagerEvent) -> PagerDocument {
    if doc.finished {
        return doc;
    }
    match event {
        PagerEvent::Resize(cols, rows) => doc.resize(cols, rows),
        PagerEvent::Quit => doc.finished = true,
        PagerEvent::Key(key) => match map_key_event(key) {
            Some(Action::Quit) => doc.finished = true,
            Some(action) if doc.ready => doc.apply(action),
            _ => {}
        },
        PagerEvent::Wheel(lines) if doc.ready => {
            let n = lines.unsigned_abs() as usize;
            if lines < 0 {
                doc.viewport.scroll_up(n);
            } else {
                doc.viewport.scroll_down(n);
            }
        }
        PagerEvent::Wheel(_) => {}
    }
    if doc.finished {
        debug!("pager: finished at offset {}", doc.scroll_offset());
    }
    doc
}

/// The full frame for `doc`: header, visible content, footer.
pub fn render(doc: &PagerDocument) -> String {
    if !doc.ready {
        return PLACEHOLDER.to_string();
    }
    let content = doc.viewport.visible().join("\n");
    format!("{}\n{}\n{}", doc.header(), content, doc.footer())
}
