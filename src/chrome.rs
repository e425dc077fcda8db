//! Pager header and footer: a bordered label followed by a horizontal rule.
//!
//! ```text
//! │ Article title ├──────────────────────────────
//! ──────────────────────────────────────┤  42% │
//! ```

use std::str::FromStr;

use unicode_width::UnicodeWidthStr;

use crate::sanitize::single_line;

/// Border glyphs for the chrome lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeStyle {
    /// Outer edge of a label (left of the title, right of the percentage).
    pub edge: char,
    /// Junction between the title label and the rule.
    pub title_joint: char,
    /// Junction between the rule and the percentage label.
    pub info_joint: char,
    /// Horizontal rule.
    pub rule: char,
    /// Spaces between the border and the label text.
    pub padding: usize,
}

impl ChromeStyle {
    pub const NORMAL: ChromeStyle = ChromeStyle {
        edge: '│',
        title_joint: '├',
        info_joint: '┤',
        rule: '─',
        padding: 1,
    };

    pub const THICK: ChromeStyle = ChromeStyle {
        edge: '┃',
        title_joint: '┣',
        info_joint: '┫',
        rule: '━',
        padding: 1,
    };

    pub const ASCII: ChromeStyle = ChromeStyle {
        edge: '|',
        title_joint: '+',
        info_joint: '+',
        rule: '-',
        padding: 1,
    };
}

impl Default for ChromeStyle {
    fn default() -> Self {
        ChromeStyle::NORMAL
    }
}

impl FromStr for ChromeStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "normal" => Ok(ChromeStyle::NORMAL),
            "thick" => Ok(ChromeStyle::THICK),
            "ascii" => Ok(ChromeStyle::ASCII),
            other => anyhow::bail!("unknown border style '{other}' (expected normal, thick or ascii)"),
        }
    }
}

fn label(left: char, text: &str, right: char, padding: usize) -> String {
    let pad = " ".repeat(padding);
    format!("{left}{pad}{text}{pad}{right}")
}

fn rule(style: &ChromeStyle, width: usize, label_width: usize) -> String {
    style.rule.to_string().repeat(width.saturating_sub(label_width))
}

/// Title label on the left, rule filling the rest of `width`.
///
/// The title is flattened to one line, so the header is always one row.
pub fn render_header(title: &str, width: usize, style: &ChromeStyle) -> String {
    let title = label(style.edge, &single_line(title), style.title_joint, style.padding);
    let line = rule(style, width, title.width());
    format!("{title}{line}")
}

/// Rule on the left, scroll percentage label on the right edge of `width`.
pub fn render_footer(percent: f64, width: usize, style: &ChromeStyle) -> String {
    let info = label(
        style.info_joint,
        &format_percent(percent),
        style.edge,
        style.padding,
    );
    let line = rule(style, width, info.width());
    format!("{line}{info}")
}

/// Fraction of the scrollable range above the viewport, in `[0, 1]`.
///
/// A document that fits entirely in the viewport reports `0`.
pub fn scroll_percent(offset: usize, total_lines: usize, visible_lines: usize) -> f64 {
    let range = total_lines.saturating_sub(visible_lines).max(1);
    (offset as f64 / range as f64).clamp(0.0, 1.0)
}

/// Integer percentage right-aligned to three columns, e.g. `" 42%"`.
pub fn format_percent(percent: f64) -> String {
    let p = (percent.clamp(0.0, 1.0) * 100.0).round() as u32;
    format!("{p:>3}%")
}

/// Number of terminal rows a rendered chrome string occupies.
pub fn height(rendered: &str) -> usize {
    rendered.split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fills_to_width() {
        let h = render_header("Title", 20, &ChromeStyle::NORMAL);
        assert_eq!(h, format!("│ Title ├{}", "─".repeat(11)));
        assert_eq!(h.width(), 20);
    }

    #[test]
    fn multi_line_title_stays_one_row() {
        let h = render_header("Part 1\nPart\t2\x1b[2J", 30, &ChromeStyle::NORMAL);
        assert_eq!(height(&h), 1);
        assert!(h.starts_with("│ Part 1 Part 2[2J ├"));
        assert_eq!(h.width(), 30);
    }

    #[test]
    fn footer_fills_to_width() {
        let f = render_footer(0.42, 20, &ChromeStyle::NORMAL);
        assert_eq!(f, format!("{}┤  42% │", "─".repeat(12)));
        assert_eq!(f.width(), 20);
    }

    #[test]
    fn wide_title_is_measured_in_cells() {
        let h = render_header("入門", 12, &ChromeStyle::NORMAL);
        // label "│ 入門 ├" is 8 cells wide
        assert_eq!(h.width(), 12);
        assert!(h.ends_with("────"));
    }

    #[test]
    fn narrow_width_has_no_fill() {
        let h = render_header("A long title", 3, &ChromeStyle::NORMAL);
        assert_eq!(h, "│ A long title ├");
        let f = render_footer(1.0, 0, &ChromeStyle::NORMAL);
        assert_eq!(f, "┤ 100% │");
    }

    #[test]
    fn chrome_is_one_line() {
        assert_eq!(height(&render_header("t", 40, &ChromeStyle::THICK)), 1);
        assert_eq!(height(&render_footer(0.0, 40, &ChromeStyle::THICK)), 1);
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(0.0), "  0%");
        assert_eq!(format_percent(0.5), " 50%");
        assert_eq!(format_percent(1.0), "100%");
        assert_eq!(format_percent(7.0), "100%");
        assert_eq!(format_percent(-1.0), "  0%");
    }

    #[test]
    fn scroll_percent_clamps_and_never_divides_by_zero() {
        assert_eq!(scroll_percent(0, 0, 18), 0.0);
        assert_eq!(scroll_percent(0, 10, 18), 0.0);
        assert_eq!(scroll_percent(241, 500, 18), 0.5);
        assert_eq!(scroll_percent(482, 500, 18), 1.0);
        assert_eq!(scroll_percent(900, 500, 18), 1.0);
    }

    #[test]
    fn ascii_style() {
        let h = render_header("x", 8, &ChromeStyle::ASCII);
        assert_eq!(h, "| x +---");
        assert_eq!("ascii".parse::<ChromeStyle>().unwrap(), ChromeStyle::ASCII);
        assert!("rounded".parse::<ChromeStyle>().is_err());
    }
}
