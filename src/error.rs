//! Error kinds surfaced by the interactive core.
//!
//! User cancellation is not in here: the finder reports it as
//! [`Selection::Aborted`](crate::finder::Selection::Aborted).

use thiserror::Error;

/// The selection mechanism itself could not run.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("fuzzy finder requires an interactive terminal")]
    NotATerminal,

    #[error("fuzzy finder terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Markdown content could not be turned into terminal text.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("article body is not valid UTF-8 (at byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

impl From<std::str::Utf8Error> for RenderError {
    fn from(e: std::str::Utf8Error) -> Self {
        RenderError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        }
    }
}
