//! Fuzzy ranking of candidate titles.

use std::cmp::Reverse;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// A candidate that survived the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Index into the caller's record list.
    pub index: usize,
    pub score: u32,
    /// Sorted char positions (not byte offsets) of matched characters.
    pub positions: Vec<usize>,
}

pub struct Ranker {
    matcher: Matcher,
    buf: Vec<char>,
}

impl Ranker {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    /// Filter and order `haystacks` against `query`.
    ///
    /// Best score first; equal scores keep input order. An empty (or
    /// all-whitespace) query matches everything in input order.
    pub fn rank(&mut self, query: &str, haystacks: &[String]) -> Vec<Candidate> {
        if query.trim().is_empty() {
            return (0..haystacks.len())
                .map(|index| Candidate {
                    index,
                    score: 0,
                    positions: Vec::new(),
                })
                .collect();
        }

        // Every query character is literal: no `!`, `^`, `$` or `'` operators.
        let pattern = Pattern::new(
            query,
            CaseMatching::Smart,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let mut indices = Vec::new();
        let mut ranked: Vec<Candidate> = haystacks
            .iter()
            .enumerate()
            .filter_map(|(index, text)| {
                // One slot per char (not per grapheme), so match indices line
                // up with `str::chars` when the title is drawn.
                let haystack = if text.is_ascii() {
                    Utf32Str::Ascii(text.as_bytes())
                } else {
                    self.buf.clear();
                    self.buf.extend(text.chars());
                    Utf32Str::Unicode(&self.buf)
                };
                let score = pattern.score(haystack, &mut self.matcher)?;
                indices.clear();
                pattern.indices(haystack, &mut self.matcher, &mut indices);
                let mut positions: Vec<usize> = indices.iter().map(|&i| i as usize).collect();
                positions.sort_unstable();
                positions.dedup();
                Some(Candidate {
                    index,
                    score,
                    positions,
                })
            })
            .collect();

        // stable: ties stay in input order
        ranked.sort_by_key(|c| Reverse(c.score));
        ranked
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}
