//! Fuzzy finder over search results with a live preview pane.
//!
//! Single- and multi-select share one engine; the only difference is the
//! selection limit passed to [`FinderState`].

mod input;
mod matcher;
mod state;
mod view;

use crossterm::event::{Event, KeyEventKind};
use log::{debug, info};

use crate::client::ResultRecord;
use crate::error::SelectError;
use crate::term::{self, EventSource, RawGuard, Screen, TermEvents, TermScreen};

pub use matcher::{Candidate, Ranker};
pub use state::FinderState;

/// Default columns taken off half the terminal width when wrapping the preview.
pub const DEFAULT_PREVIEW_MARGIN: u16 = 5;

/// Result of one finder session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Chosen(T),
    /// The user cancelled. Not an error.
    Aborted,
}

#[derive(Debug, Clone, Copy)]
pub struct FinderOptions {
    pub preview_margin: u16,
    pub color: bool,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            preview_margin: DEFAULT_PREVIEW_MARGIN,
            color: true,
        }
    }
}

/// Pick any number of records. Indices come back in the order they were picked.
pub fn select_many(
    records: &[ResultRecord],
    options: &FinderOptions,
) -> Result<Selection<Vec<usize>>, SelectError> {
    if records.is_empty() {
        return Ok(Selection::Chosen(Vec::new()));
    }
    on_terminal(|events, screen| select_many_with(records, options, events, screen))
}

/// Pick exactly one record.
pub fn select_one(
    records: &[ResultRecord],
    options: &FinderOptions,
) -> Result<Selection<usize>, SelectError> {
    if records.is_empty() {
        return Ok(Selection::Aborted);
    }
    on_terminal(|events, screen| select_one_with(records, options, events, screen))
}

pub fn select_many_with(
    records: &[ResultRecord],
    options: &FinderOptions,
    events: &mut impl EventSource,
    screen: &mut impl Screen,
) -> Result<Selection<Vec<usize>>, SelectError> {
    if records.is_empty() {
        return Ok(Selection::Chosen(Vec::new()));
    }
    run(FinderState::new(records, None, options.preview_margin), options, events, screen)
}

pub fn select_one_with(
    records: &[ResultRecord],
    options: &FinderOptions,
    events: &mut impl EventSource,
    screen: &mut impl Screen,
) -> Result<Selection<usize>, SelectError> {
    if records.is_empty() {
        return Ok(Selection::Aborted);
    }
    let state = FinderState::new(records, Some(1), options.preview_margin);
    let outcome = run(state, options, events, screen)?;
    Ok(match outcome {
        Selection::Chosen(picked) => match picked.first() {
            Some(&index) => Selection::Chosen(index),
            None => Selection::Aborted,
        },
        Selection::Aborted => Selection::Aborted,
    })
}

fn on_terminal<T>(
    f: impl FnOnce(&mut TermEvents, &mut TermScreen) -> Result<T, SelectError>,
) -> Result<T, SelectError> {
    term::check_tty().map_err(|_| SelectError::NotATerminal)?;
    let mut guard = RawGuard::enter(false)?;
    let result = f(&mut TermEvents, &mut TermScreen);
    guard.cleanup();
    result
}

/// The event loop: block on an event, update, redraw.
fn run(
    mut state: FinderState,
    options: &FinderOptions,
    events: &mut impl EventSource,
    screen: &mut impl Screen,
) -> Result<Selection<Vec<usize>>, SelectError> {
    let (cols, rows) = screen.size()?;
    state.resize(cols, rows);
    info!(
        "finder: {} candidates (multi={})",
        state.total(),
        state.is_multi()
    );
    screen.draw(&view::render(&state, options.color))?;

    loop {
        match events.next_event()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let Some(action) = input::map_key_event(key) else {
                    continue;
                };
                if let Some(outcome) = state.handle(action) {
                    debug!("finder: {outcome:?}");
                    return Ok(outcome);
                }
            }
            Event::Resize(cols, rows) => state.resize(cols, rows),
            _ => continue,
        }
        screen.draw(&view::render(&state, options.color))?;
    }
}
