//! Text shown in the finder's preview pane for the highlighted result.

use textwrap::{Options, WordSplitter};

use crate::client::ResultRecord;
use crate::sanitize::single_line;

/// Header, title, snippet and space-joined tags, separated by blank lines.
///
/// Each section is flattened to one clean line first, so the blank-line
/// layout holds whatever the scraped fields contain.
pub fn format_preview(record: &ResultRecord) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        single_line(&record.header),
        single_line(&record.title),
        single_line(&record.snippet),
        single_line(&record.tags.join(" ")),
    )
}

/// Wrap every line of `text` to at most `width` display columns.
///
/// Width is measured in terminal cells, so CJK text wraps at half the
/// character count of ASCII. Blank lines are kept.
pub fn wrap_preview(text: &str, width: usize) -> String {
    let options = Options::new(width.max(1)).word_splitter(WordSplitter::NoHyphenation);
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                textwrap::fill(line, &options)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap width for a terminal `term_cols` wide: half the screen minus `margin`.
pub fn preview_wrap_width(term_cols: u16, margin: u16) -> usize {
    usize::from((term_cols / 2).saturating_sub(margin)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    fn record() -> ResultRecord {
        ResultRecord {
            header: "alice posted on 2022/01/02".into(),
            title: "Rust basics".into(),
            link: "/alice/items/1".into(),
            snippet: "Ownership and borrowing".into(),
            tags: vec!["Rust".into(), "beginner".into()],
        }
    }

    #[test]
    fn sections_in_order() {
        assert_eq!(
            format_preview(&record()),
            "alice posted on 2022/01/02\n\nRust basics\n\nOwnership and borrowing\n\nRust beginner"
        );
    }

    #[test]
    fn empty_fields_render_as_empty_lines() {
        let text = format_preview(&ResultRecord::default());
        assert_eq!(text, "\n\n\n\n\n\n");
    }

    #[test]
    fn sections_are_flattened() {
        let r = ResultRecord {
            header: "alice\nposted".into(),
            title: "a\x1b]0;x\x07b".into(),
            snippet: "one\n\ntwo".into(),
            tags: vec!["Rust\n".into(), "CLI".into()],
            ..Default::default()
        };
        assert_eq!(format_preview(&r), "alice posted\n\na]0;xb\n\none two\n\nRust CLI");
    }

    #[test]
    fn wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        let wrapped = wrap_preview(text, 10);
        assert!(wrapped.lines().count() > 1);
        for line in wrapped.lines() {
            assert!(line.width() <= 10, "{line:?} too wide");
        }
    }

    #[test]
    fn wrap_counts_cjk_as_double_width() {
        let wrapped = wrap_preview("所有権と借用についての解説記事です", 10);
        for line in wrapped.lines() {
            assert!(line.width() <= 10, "{line:?} too wide");
        }
    }

    #[test]
    fn wrap_keeps_blank_lines() {
        let wrapped = wrap_preview("a\n\nb", 20);
        assert_eq!(wrapped, "a\n\nb");
    }

    #[test]
    fn wrap_width_zero_does_not_panic() {
        let wrapped = wrap_preview("abc", 0);
        assert_eq!(wrapped.lines().count(), 3);
    }

    #[test]
    fn wrap_width_from_terminal() {
        assert_eq!(preview_wrap_width(100, 5), 45);
        assert_eq!(preview_wrap_width(81, 5), 35);
        assert_eq!(preview_wrap_width(8, 5), 1);
    }
}
