//! Finder frame: candidate list on the left, boxed preview on the right.
//!
//! Layout:
//!   Row 0     : `> query_` prompt
//!   Row 1     : match count (and pick count in multi-select)
//!   Row 2..N  : candidate list (scrolled, with highlight)
//!   right half: preview box spanning every row

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthChar;

use super::state::{FinderState, LIST_TOP};

/// Build the whole frame, one line per terminal row.
pub fn render(state: &FinderState, color: bool) -> String {
    let cols = usize::from(state.cols);
    let rows = usize::from(state.rows);
    let right_w = cols / 2;
    let left_w = cols - right_w;

    let preview = preview_box(state.preview_text().unwrap_or(""), right_w, rows);

    (0..rows)
        .map(|row| {
            let left = match row {
                0 => prompt_line(&state.query, left_w, color),
                1 => count_line(state, left_w, color),
                _ => list_line(state, row - LIST_TOP, left_w, color),
            };
            match preview.get(row) {
                Some(right) => format!("{left}{right}"),
                None => format!("{left}{}", " ".repeat(right_w)),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn prompt_line(query: &str, width: usize, color: bool) -> String {
    let (text, used) = fit(&format!("> {query}_"), width);
    let pad = " ".repeat(width - used);
    if color {
        format!("{}{pad}", text.white().bold())
    } else {
        format!("{text}{pad}")
    }
}

fn count_line(state: &FinderState, width: usize, color: bool) -> String {
    let mut status = format!("  {}/{}", state.matches.len(), state.total());
    if state.is_multi() && !state.picked.is_empty() {
        status.push_str(&format!(" ({} selected)", state.picked.len()));
    }
    let (text, used) = fit(&status, width);
    let pad = " ".repeat(width - used);
    if color {
        format!("{}{pad}", text.dark_grey())
    } else {
        format!("{text}{pad}")
    }
}

/// One candidate row: cursor, pick mark, title with matched chars highlighted.
fn list_line(state: &FinderState, list_row: usize, width: usize, color: bool) -> String {
    let pos = state.scroll_offset + list_row;
    let Some(candidate) = state.matches.get(pos) else {
        return " ".repeat(width);
    };
    let is_selected = pos == state.selected;
    let cursor = if is_selected { '>' } else { ' ' };
    let mark = if state.is_picked(candidate.index) { '*' } else { ' ' };

    // one column of gap before the preview pane
    let avail = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    let prefix = [cursor, mark, ' '];
    let title = &state.titles()[candidate.index];
    let mut matched = candidate.positions.iter().peekable();

    for (i, c) in prefix.into_iter().chain(title.chars()).enumerate() {
        let w = c.width().unwrap_or(0);
        if used + w > avail {
            break;
        }
        used += w;
        let char_idx = i.wrapping_sub(prefix.len());
        let is_match = i >= prefix.len() && matched.next_if_eq(&&char_idx).is_some();
        if !color {
            out.push(c);
        } else if is_match && is_selected {
            out.push_str(&c.on_dark_blue().yellow().bold().to_string());
        } else if is_match {
            out.push_str(&c.yellow().bold().to_string());
        } else if is_selected {
            out.push_str(&c.on_dark_blue().white().to_string());
        } else {
            out.push(c);
        }
    }

    if color && is_selected {
        // selection bar runs up to the gap column
        let bar = avail.saturating_sub(used);
        let gap = width - used - bar;
        format!("{out}{}{}", " ".repeat(bar).on_dark_blue(), " ".repeat(gap))
    } else {
        format!("{out}{}", " ".repeat(width - used))
    }
}

/// Preview text in a box `width` columns wide and `rows` rows tall.
///
/// Returns no rows when the pane is too narrow to hold a box.
fn preview_box(text: &str, width: usize, rows: usize) -> Vec<String> {
    if width < 4 || rows < 2 {
        return Vec::new();
    }
    let inner = width - 4;
    let mut lines = Vec::with_capacity(rows);
    lines.push(format!("┌{}┐", "─".repeat(width - 2)));
    let mut body = text.split('\n');
    for _ in 0..rows - 2 {
        let (line, used) = fit(body.next().unwrap_or(""), inner);
        lines.push(format!("│ {line}{} │", " ".repeat(inner - used)));
    }
    lines.push(format!("└{}┘", "─".repeat(width - 2)));
    lines
}

/// Longest prefix of `text` that fits in `width` cells, and its width.
fn fit(text: &str, width: usize) -> (String, usize) {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    (out, used)
}
