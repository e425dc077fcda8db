//! Terminal I/O layer: raw mode guard, panic restore, frame drawing.
//!
//! The finder and the pager only see the [`EventSource`] and [`Screen`]
//! traits, so their event loops run unchanged against scripted input in tests.
//!
//! Frames go to stderr and keys come from `/dev/tty`, which leaves stdout
//! free for the URLs printed after a selection (`qiitaz rust | xargs ...`).

use std::io::{self, BufWriter, IsTerminal, Write, stderr};
use std::panic;
use std::sync::Once;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::{QueueableCommand, cursor, execute, style, terminal};
use log::debug;

/// Blocking source of terminal events.
pub trait EventSource {
    fn next_event(&mut self) -> io::Result<Event>;
}

/// Somewhere a full frame can be drawn.
pub trait Screen {
    /// `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;
    /// Replace the whole screen with `frame`, one `\n`-separated line per row.
    fn draw(&mut self, frame: &str) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// RawGuard: Drop restores raw mode / alternate screen / cursor / mouse
// ---------------------------------------------------------------------------

pub struct RawGuard {
    mouse: bool,
    cleaned: bool,
}

impl RawGuard {
    /// Take over the terminal. `mouse` additionally enables mouse capture.
    pub fn enter(mouse: bool) -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        // From here on Drop undoes whatever part of the setup succeeded.
        let guard = Self {
            mouse,
            cleaned: false,
        };
        let mut out = stderr();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            cursor::Hide
        )?;
        if mouse {
            execute!(out, EnableMouseCapture)?;
        }
        debug!("term: raw mode entered (mouse={mouse})");
        Ok(guard)
    }

    pub fn cleanup(&mut self) {
        if self.cleaned {
            return;
        }
        self.cleaned = true;
        if self.mouse {
            let _ = execute!(stderr(), DisableMouseCapture);
        }
        restore_terminal();
        debug!("term: terminal restored");
    }
}

impl Drop for RawGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Put the terminal back into cooked mode. Safe to call more than once.
fn restore_terminal() {
    let mut out = stderr();
    let _ = execute!(
        out,
        DisableMouseCapture,
        style::ResetColor,
        cursor::Show,
        terminal::EnableLineWrap,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let original = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            original(info);
        }));
    });
}

pub fn check_tty() -> io::Result<()> {
    // Keyboard input comes from /dev/tty (crossterm `use-dev-tty`), so only
    // the drawing target has to be a terminal.
    if !stderr().is_terminal() {
        return Err(io::Error::other("stderr is not an interactive terminal"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// crossterm-backed implementations
// ---------------------------------------------------------------------------

/// Reads events from the controlling terminal, dropping key releases.
pub struct TermEvents;

impl EventSource for TermEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        loop {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Release => continue,
                ev => return Ok(ev),
            }
        }
    }
}

/// Draws frames to stderr. Lines longer than the terminal are clipped
/// (line wrap is off while a [`RawGuard`] is held).
pub struct TermScreen;

impl Screen for TermScreen {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn draw(&mut self, frame: &str) -> io::Result<()> {
        let (_, rows) = terminal::size()?;
        let mut out = BufWriter::new(stderr().lock());
        for (row, line) in frame.split('\n').take(rows as usize).enumerate() {
            out.queue(cursor::MoveTo(0, row as u16))?;
            write!(out, "{line}")?;
            out.queue(style::SetAttribute(style::Attribute::Reset))?;
            out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        }
        out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        out.flush()
    }
}

// ---------------------------------------------------------------------------
// Scripted implementations (tests, fuzzing)
// ---------------------------------------------------------------------------

/// Replays a fixed list of events; an exhausted script reads as EOF.
pub struct ScriptedEvents {
    events: std::collections::VecDeque<io::Result<Event>>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = io::Result<Event>>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        self.events.pop_front().unwrap_or_else(|| {
            Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "event script exhausted",
            ))
        })
    }
}

/// Keeps every drawn frame.
pub struct RecordingScreen {
    pub cols: u16,
    pub rows: u16,
    pub frames: Vec<String>,
}

impl RecordingScreen {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            frames: Vec::new(),
        }
    }

    pub fn last(&self) -> &str {
        self.frames.last().map(String::as_str).unwrap_or("")
    }
}

impl Screen for RecordingScreen {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.cols, self.rows))
    }

    fn draw(&mut self, frame: &str) -> io::Result<()> {
        self.frames.push(frame.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn scripted_events_replay_then_eof() {
        let mut src = ScriptedEvents::new([
            Ok(Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE))),
            Ok(Event::Resize(10, 5)),
        ]);
        assert!(matches!(src.next_event(), Ok(Event::Key(_))));
        assert!(matches!(src.next_event(), Ok(Event::Resize(10, 5))));
        let err = src.next_event().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn recording_screen_keeps_frames() {
        let mut screen = RecordingScreen::new(80, 24);
        assert_eq!(screen.size().unwrap(), (80, 24));
        assert_eq!(screen.last(), "");
        screen.draw("one").unwrap();
        screen.draw("two").unwrap();
        assert_eq!(screen.frames.len(), 2);
        assert_eq!(screen.last(), "two");
    }
}
