//! Finder state: query, ranked matches, highlight, picks and preview.

use log::debug;

use super::Selection;
use super::input::FinderAction;
use super::matcher::{Candidate, Ranker};
use crate::client::ResultRecord;
use crate::preview::{format_preview, preview_wrap_width, wrap_preview};
use crate::sanitize::single_line;

/// Rows above the candidate list: prompt and match count.
pub(super) const LIST_TOP: usize = 2;

struct Preview {
    record: usize,
    width: usize,
    text: String,
}

pub struct FinderState<'a> {
    records: &'a [ResultRecord],
    titles: Vec<String>,
    ranker: Ranker,
    /// `None` means unbounded.
    max_selections: Option<usize>,
    pub query: String,
    pub matches: Vec<Candidate>,
    /// Highlighted position in `matches`.
    pub selected: usize,
    pub scroll_offset: usize,
    /// Record indices in the order they were toggled on.
    pub picked: Vec<usize>,
    pub cols: u16,
    pub rows: u16,
    preview_margin: u16,
    preview: Option<Preview>,
    preview_renders: usize,
}

impl<'a> FinderState<'a> {
    pub fn new(records: &'a [ResultRecord], max_selections: Option<usize>, preview_margin: u16) -> Self {
        let titles: Vec<String> = records.iter().map(|r| single_line(&r.title)).collect();
        let mut state = Self {
            records,
            titles,
            ranker: Ranker::new(),
            max_selections,
            query: String::new(),
            matches: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            picked: Vec::new(),
            cols: 0,
            rows: 0,
            preview_margin,
            preview: None,
            preview_renders: 0,
        };
        state.refilter();
        state
    }

    /// Whether more than one candidate can be chosen.
    pub fn is_multi(&self) -> bool {
        self.max_selections != Some(1)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Record index of the highlighted candidate.
    pub fn highlighted(&self) -> Option<usize> {
        self.matches.get(self.selected).map(|c| c.index)
    }

    pub fn is_picked(&self, record: usize) -> bool {
        self.picked.contains(&record)
    }

    pub fn list_rows(&self) -> usize {
        usize::from(self.rows).saturating_sub(LIST_TOP)
    }

    pub fn preview_text(&self) -> Option<&str> {
        self.preview.as_ref().map(|p| p.text.as_str())
    }

    /// How many times the preview has been formatted and wrapped.
    pub fn preview_renders(&self) -> usize {
        self.preview_renders
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.keep_selected_visible();
        self.refresh_preview();
    }

    /// Apply one action. Returns the outcome once the session is over.
    pub fn handle(&mut self, action: FinderAction) -> Option<Selection<Vec<usize>>> {
        match action {
            FinderAction::Type(c) => {
                self.query.push(c);
                self.refilter();
            }
            FinderAction::Backspace => {
                if self.query.pop().is_some() {
                    self.refilter();
                }
            }
            FinderAction::ClearQuery => {
                if !self.query.is_empty() {
                    self.query.clear();
                    self.refilter();
                }
            }
            FinderAction::DeleteWord => {
                let kept = self.query.trim_end().len();
                let start = self.query[..kept]
                    .rfind(char::is_whitespace)
                    .map_or(0, |i| i + 1);
                self.query.truncate(start);
                self.refilter();
            }
            FinderAction::SelectPrev => {
                self.selected = self.selected.saturating_sub(1);
                self.keep_selected_visible();
            }
            FinderAction::SelectNext => self.select_next(),
            FinderAction::Toggle => self.toggle(),
            FinderAction::Accept => return self.accept(),
            FinderAction::Abort => return Some(Selection::Aborted),
        }
        self.refresh_preview();
        None
    }

    fn select_next(&mut self) {
        if !self.matches.is_empty() {
            self.selected = (self.selected + 1).min(self.matches.len() - 1);
        }
        self.keep_selected_visible();
    }

    fn toggle(&mut self) {
        if !self.is_multi() {
            return;
        }
        let Some(record) = self.highlighted() else {
            return;
        };
        if let Some(pos) = self.picked.iter().position(|&r| r == record) {
            self.picked.remove(pos);
        } else if self.max_selections.is_none_or(|max| self.picked.len() < max) {
            self.picked.push(record);
        }
        self.select_next();
    }

    fn accept(&mut self) -> Option<Selection<Vec<usize>>> {
        if !self.picked.is_empty() {
            return Some(Selection::Chosen(self.picked.clone()));
        }
        match self.highlighted() {
            Some(record) => Some(Selection::Chosen(vec![record])),
            None if self.is_multi() => Some(Selection::Chosen(Vec::new())),
            None => None,
        }
    }

    fn refilter(&mut self) {
        self.matches = self.ranker.rank(&self.query, &self.titles);
        self.selected = 0;
        self.scroll_offset = 0;
        debug!(
            "finder: query {:?} -> {}/{} matches",
            self.query,
            self.matches.len(),
            self.titles.len()
        );
    }

    fn keep_selected_visible(&mut self) {
        let rows = self.list_rows().max(1);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + rows {
            self.scroll_offset = self.selected + 1 - rows;
        }
    }

    /// Recompute the preview when the highlighted record or the wrap width
    /// changed since the last time.
    fn refresh_preview(&mut self) {
        let Some(record) = self.highlighted() else {
            self.preview = None;
            return;
        };
        let width = preview_wrap_width(self.cols, self.preview_margin);
        let cached = self.preview.as_ref();
        if cached.is_some_and(|p| p.record == record && p.width == width) {
            return;
        }
        let text = wrap_preview(&format_preview(&self.records[record]), width);
        self.preview_renders += 1;
        debug!("finder: preview for record {record} at width {width}");
        self.preview = Some(Preview {
            record,
            width,
            text,
        });
    }
}
