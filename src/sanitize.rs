//! Scrubbing for text fetched over the network before it reaches the terminal.
//!
//! Article bodies and scraped fields may carry ESC, BEL and other control
//! characters. Written raw, they would be interpreted by the terminal
//! (clearing the screen, setting the window title) or break the layout.

/// Remove control characters, keeping `\n` and `\t`.
///
/// Callers decide what a tab means (code blocks expand it, prose turns it
/// into a space).
pub fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}

/// Like [`strip_controls`], with tabs turned into spaces.
pub fn inline_text(text: &str) -> String {
    strip_controls(text).replace('\t', " ")
}

/// One display line: control characters removed, every whitespace run
/// (newlines and tabs included) collapsed to a single space, ends trimmed.
pub fn single_line(text: &str) -> String {
    text.split_whitespace()
        .map(strip_controls)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
