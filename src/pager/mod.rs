//! In-terminal Markdown pager.
//!
//! Layout:
//!   row 0            : header (`│ title ├────`)
//!   rows 1..rows-1   : rendered article, scrolled by whole lines
//!   row rows-1       : footer (`────┤  42% │`)
//!
//! The article is rendered once at construction; the event loop only moves a
//! window over the rendered lines, so it can fail on terminal I/O and nothing
//! else.

mod input;
mod state;
mod viewport;

use std::io;

use crossterm::event::{Event, KeyEventKind, MouseEventKind};
use log::{debug, info};

use crate::chrome::ChromeStyle;
use crate::error::RenderError;
use crate::markdown::{RenderOptions, render_markdown};
use crate::term::{self, EventSource, RawGuard, Screen, TermEvents, TermScreen};

pub use state::{PagerDocument, PagerEvent, render, transition};

/// Lines scrolled per mouse wheel notch unless configured otherwise.
pub const DEFAULT_WHEEL_STEP: u16 = 3;

#[derive(Debug, Clone, Copy)]
pub struct PagerOptions {
    pub render: RenderOptions,
    pub style: ChromeStyle,
    pub wheel_step: u16,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            style: ChromeStyle::default(),
            wheel_step: DEFAULT_WHEEL_STEP,
        }
    }
}

/// One article, rendered and ready to page through.
pub struct Pager {
    doc: PagerDocument,
    wheel_step: u16,
}

impl Pager {
    /// Render `markdown` for display under `title`.
    pub fn new(title: &str, markdown: &[u8], options: &PagerOptions) -> Result<Self, RenderError> {
        let content = render_markdown(markdown, &options.render)?;
        Ok(Self {
            doc: PagerDocument::new(title, &content, options.style),
            wheel_step: options.wheel_step,
        })
    }

    pub fn document(&self) -> &PagerDocument {
        &self.doc
    }

    /// Run the session on the real terminal until the user quits.
    pub fn run(self) -> anyhow::Result<()> {
        term::check_tty()?;
        let mut guard = RawGuard::enter(true)?;
        let result = self.run_with(&mut TermEvents, &mut TermScreen);
        guard.cleanup();
        result?;
        Ok(())
    }

    /// Run the session against any event source and screen.
    ///
    /// The screen's current size is fed in as the first sizing event. Returns
    /// the final (finished) document.
    pub fn run_with(
        self,
        events: &mut impl EventSource,
        screen: &mut impl Screen,
    ) -> io::Result<PagerDocument> {
        let Pager {
            mut doc,
            wheel_step,
        } = self;
        info!("pager: '{}' ({} lines)", doc.title, doc.total_lines());

        let (cols, rows) = screen.size()?;
        doc = transition(doc, PagerEvent::Resize(cols, rows));
        let mut last_frame = render(&doc);
        screen.draw(&last_frame)?;

        while !doc.is_finished() {
            let Some(event) = to_pager_event(events.next_event()?, wheel_step) else {
                continue;
            };
            let before = doc.scroll_offset();
            doc = transition(doc, event);
            if doc.scroll_offset() != before {
                debug!("pager: offset {before} -> {}", doc.scroll_offset());
            }
            if doc.is_finished() {
                break;
            }
            let frame = render(&doc);
            if frame != last_frame {
                screen.draw(&frame)?;
                last_frame = frame;
            }
        }
        Ok(doc)
    }
}

/// Translate a terminal event; `None` for events the pager ignores.
fn to_pager_event(event: Event, wheel_step: u16) -> Option<PagerEvent> {
    let step = i32::from(wheel_step);
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(PagerEvent::Key(key)),
        Event::Resize(cols, rows) => Some(PagerEvent::Resize(cols, rows)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Some(PagerEvent::Wheel(step)),
            MouseEventKind::ScrollUp => Some(PagerEvent::Wheel(-step)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{RecordingScreen, ScriptedEvents};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

    fn press(c: char) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    fn wheel(kind: MouseEventKind) -> io::Result<Event> {
        Ok(Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }))
    }

    fn options() -> PagerOptions {
        PagerOptions {
            render: RenderOptions {
                width: 60,
                color: false,
            },
            ..Default::default()
        }
    }

    fn long_article() -> Vec<u8> {
        (1..=200)
            .map(|i| format!("paragraph {i}\n\n"))
            .collect::<String>()
            .into_bytes()
    }

    #[test]
    fn invalid_utf8_is_a_render_error() {
        let err = Pager::new("t", b"\xff\xfe", &options()).err();
        assert!(matches!(err, Some(RenderError::InvalidUtf8 { valid_up_to: 0 })));
    }

    #[test]
    fn session_runs_until_quit() {
        let pager = Pager::new("Article", &long_article(), &options()).unwrap();
        let mut events = ScriptedEvents::new([press('G'), press('g'), press('j'), press('q')]);
        let mut screen = RecordingScreen::new(60, 20);
        let doc = pager.run_with(&mut events, &mut screen).unwrap();
        assert!(doc.is_finished());
        assert_eq!(doc.scroll_offset(), 1);
        // initial frame + G + g + j
        assert_eq!(screen.frames.len(), 4);
        assert!(screen.frames[0].starts_with("│ Article ├"));
        assert!(screen.frames[1].ends_with("┤ 100% │"));
    }

    #[test]
    fn unchanged_frames_are_not_redrawn() {
        let pager = Pager::new("Article", &long_article(), &options()).unwrap();
        let mut events =
            ScriptedEvents::new([press('k'), press('x'), Ok(Event::FocusGained), press('q')]);
        let mut screen = RecordingScreen::new(60, 20);
        pager.run_with(&mut events, &mut screen).unwrap();
        assert_eq!(screen.frames.len(), 1);
    }

    #[test]
    fn wheel_scrolls_by_step() {
        let pager = Pager::new("Article", &long_article(), &options()).unwrap();
        let mut events = ScriptedEvents::new([
            wheel(MouseEventKind::ScrollDown),
            wheel(MouseEventKind::ScrollDown),
            wheel(MouseEventKind::ScrollUp),
            wheel(MouseEventKind::Moved),
            press('q'),
        ]);
        let mut screen = RecordingScreen::new(60, 20);
        let doc = pager.run_with(&mut events, &mut screen).unwrap();
        assert_eq!(doc.scroll_offset(), 3);
    }

    #[test]
    fn io_failure_ends_the_session_with_an_error() {
        let pager = Pager::new("Article", &long_article(), &options()).unwrap();
        let mut events = ScriptedEvents::new([press('j')]);
        let mut screen = RecordingScreen::new(60, 20);
        assert!(pager.run_with(&mut events, &mut screen).is_err());
    }

    #[test]
    fn resize_event_redraws_at_new_width() {
        let pager = Pager::new("Article", &long_article(), &options()).unwrap();
        let mut events = ScriptedEvents::new([Ok(Event::Resize(30, 10)), press('q')]);
        let mut screen = RecordingScreen::new(60, 20);
        let doc = pager.run_with(&mut events, &mut screen).unwrap();
        assert_eq!(doc.visible_lines(), 8);
        let header = screen.last().lines().next().unwrap_or("");
        assert_eq!(unicode_width::UnicodeWidthStr::width(header), 30);
    }
}
