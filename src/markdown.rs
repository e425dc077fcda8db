//! Markdown → styled terminal text.
//!
//! Block structure is tracked with a container stack the same way for every
//! block kind: quotes and list items contribute a line prefix, inline tags
//! contribute a `ContentStyle`. Inline content of the current block is
//! collected into a buffer and word-wrapped when the block closes.
//!
//! Styles are applied per word, so a wrap point never falls inside an escape
//! sequence and every line of the output is self-contained.

use std::time::Instant;

use crossterm::style::{Attribute, Color, ContentStyle};
use log::info;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use textwrap::WordSplitter;
use textwrap::core::display_width;

use crate::error::RenderError;
use crate::sanitize::{inline_text, single_line, strip_controls};

/// Left margin of the whole document, in columns.
const MARGIN: usize = 2;
const CODE_INDENT: &str = "  ";
const MAX_BLOCKQUOTE_DEPTH: usize = 10;

/// Knobs for [`render_markdown`].
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Total line width (margin included) that prose is wrapped to.
    pub width: usize,
    /// Emit ANSI colours and attributes.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            color: true,
        }
    }
}

/// Convert raw Markdown bytes to terminal text, one output line per row.
///
/// The only failure is input that is not valid UTF-8.
pub fn render_markdown(markdown: &[u8], options: &RenderOptions) -> Result<String, RenderError> {
    let start = Instant::now();
    let text = std::str::from_utf8(markdown)?;

    let mut md_options = Options::empty();
    md_options.insert(Options::ENABLE_TABLES);
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::new(*options);
    for event in Parser::new_ext(text, md_options) {
        renderer.event(event);
    }
    let output = renderer.finish();

    info!(
        "markdown: rendered in {:.1}ms (input: {} bytes, output: {} lines)",
        start.elapsed().as_secs_f64() * 1000.0,
        markdown.len(),
        output.lines().count()
    );
    Ok(output)
}

/// Inline containers; each one contributes to the current text style.
#[derive(Debug)]
enum Inline {
    Heading(HeadingLevel),
    Strong,
    Emphasis,
    Strikethrough,
    Link { url: String, text: String },
    Image { url: String },
}

/// Block containers that prefix every line rendered inside them.
#[derive(Debug)]
enum Block {
    Quote { bar: String },
    /// `marker` goes on the first line of the item, `pad` on the rest.
    Item { marker: String, pad: String, used: bool },
}

struct Table {
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    has_head: bool,
}

struct Renderer {
    options: RenderOptions,
    lines: Vec<String>,
    last_blank: bool,
    /// Inline content of the block being built (already styled).
    buf: String,
    inline: Vec<Inline>,
    blocks: Vec<Block>,
    /// One entry per open list: the next ordinal, or `None` for bullets.
    lists: Vec<Option<u64>>,
    /// Whether each open block quote pushed a `Block::Quote` (depth cap).
    quotes: Vec<bool>,
    code: Option<String>,
    table: Option<Table>,
}

impl Renderer {
    fn new(options: RenderOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            last_blank: true,
            buf: String::new(),
            inline: Vec::new(),
            blocks: Vec::new(),
            lists: Vec::new(),
            quotes: Vec::new(),
            code: None,
            table: None,
        }
    }

    fn event(&mut self, event: Event) {
        match event {
            // === Block-level Start tags ===
            Event::Start(Tag::Paragraph) => {
                self.flush();
                self.block_gap();
            }
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush();
                self.block_gap();
                self.inline.push(Inline::Heading(level));
                let hashes = "#".repeat(level as usize);
                self.push_text(&format!("{hashes} "));
            }
            Event::Start(Tag::BlockQuote(_)) => {
                self.flush();
                self.block_gap();
                let capped = self.quotes.iter().filter(|&&q| q).count() >= MAX_BLOCKQUOTE_DEPTH;
                if !capped {
                    let bar = self.paint("│", dim());
                    self.blocks.push(Block::Quote {
                        bar: format!("{bar} "),
                    });
                }
                self.quotes.push(!capped);
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush();
                self.block_gap();
                match &kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        let label = self.paint(&single_line(lang), dim());
                        let (first, _) = self.prefixes();
                        self.push_line(format!("{first}{label}"));
                    }
                    _ => {}
                }
                self.code = Some(String::new());
            }
            Event::Start(Tag::HtmlBlock) => {
                self.flush();
                self.block_gap();
            }
            Event::Start(Tag::List(start)) => {
                self.flush();
                if self.lists.is_empty() {
                    self.block_gap();
                }
                self.lists.push(start);
            }
            Event::Start(Tag::Item) => {
                self.flush();
                let depth = self.lists.len();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{n}. ");
                        *n += 1;
                        m
                    }
                    _ if depth > 1 => "◦ ".to_string(),
                    _ => "• ".to_string(),
                };
                let pad = " ".repeat(display_width(&marker));
                let marker = self.paint(&marker, marker_style());
                self.blocks.push(Block::Item {
                    marker,
                    pad,
                    used: false,
                });
            }
            Event::Start(Tag::Table(alignments)) => {
                self.flush();
                self.block_gap();
                self.table = Some(Table {
                    alignments,
                    rows: Vec::new(),
                    row: Vec::new(),
                    has_head: false,
                });
            }
            Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => {
                if let Some(t) = self.table.as_mut() {
                    t.row.clear();
                }
            }
            Event::Start(Tag::TableCell) => {
                self.buf.clear();
            }

            // === Inline Start tags ===
            Event::Start(Tag::Strong) => self.inline.push(Inline::Strong),
            Event::Start(Tag::Emphasis) => self.inline.push(Inline::Emphasis),
            Event::Start(Tag::Strikethrough) => self.inline.push(Inline::Strikethrough),
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.inline.push(Inline::Link {
                    url: single_line(&dest_url),
                    text: String::new(),
                });
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                self.inline.push(Inline::Image {
                    url: single_line(&dest_url),
                });
                self.push_text("[image: ");
            }

            // === End tags ===
            Event::End(TagEnd::Paragraph) => self.flush(),
            Event::End(TagEnd::Heading(_)) => {
                self.flush();
                self.inline.pop();
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                self.flush();
                if self.quotes.pop() == Some(true) {
                    self.blocks.pop();
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                let code = self.code.take().unwrap_or_default();
                let (first, rest) = self.prefixes();
                for (i, line) in code.lines().enumerate() {
                    let prefix = if i == 0 { &first } else { &rest };
                    let line = line.replace('\t', "    ");
                    let painted = self.paint(&line, code_style());
                    self.push_line(format!("{prefix}{CODE_INDENT}{painted}"));
                }
            }
            Event::End(TagEnd::HtmlBlock) => {}
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.lists.pop();
            }
            Event::End(TagEnd::Item) => {
                self.flush();
                if matches!(self.blocks.last(), Some(Block::Item { .. })) {
                    self.blocks.pop();
                }
            }
            Event::End(TagEnd::TableCell) => {
                let cell = std::mem::take(&mut self.buf);
                if let Some(t) = self.table.as_mut() {
                    t.row.push(cell.trim().to_string());
                }
            }
            Event::End(TagEnd::TableHead) => {
                if let Some(t) = self.table.as_mut() {
                    let row = std::mem::take(&mut t.row);
                    t.rows.push(row);
                    t.has_head = true;
                }
            }
            Event::End(TagEnd::TableRow) => {
                if let Some(t) = self.table.as_mut() {
                    let row = std::mem::take(&mut t.row);
                    t.rows.push(row);
                }
            }
            Event::End(TagEnd::Table) => {
                if let Some(table) = self.table.take() {
                    self.render_table(table);
                }
            }
            Event::End(TagEnd::Strong)
            | Event::End(TagEnd::Emphasis)
            | Event::End(TagEnd::Strikethrough) => {
                self.inline.pop();
            }
            Event::End(TagEnd::Link) => {
                match self.inline.pop() {
                    Some(Inline::Link { url, text }) if !url.is_empty() && text != url => {
                        self.buf.push(' ');
                        self.push_styled(&format!("({url})"), dim());
                    }
                    _ => {}
                }
            }
            Event::End(TagEnd::Image) => {
                if let Some(Inline::Image { url }) = self.inline.pop() {
                    self.push_styled("]", dim());
                    if !url.is_empty() {
                        self.buf.push(' ');
                        self.push_styled(&format!("({url})"), dim());
                    }
                }
            }

            // === Leaf events ===
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.push_str(&strip_controls(&text));
                } else {
                    self.push_text(&inline_text(&text));
                }
            }
            Event::Code(code) => {
                let code = inline_text(&code);
                let style = self.current_style();
                self.push_styled(&code, with_fg(style, Color::Yellow));
                self.record_link_text(&code);
            }
            Event::Html(html) => {
                let html = strip_controls(&html).replace('\t', "    ");
                let (first, rest) = self.prefixes();
                for (i, line) in html.lines().enumerate() {
                    let prefix = if i == 0 { &first } else { &rest };
                    let painted = self.paint(line, dim());
                    self.push_line(format!("{prefix}{painted}"));
                }
            }
            Event::InlineHtml(html) => self.push_styled(&inline_text(&html), dim()),
            Event::FootnoteReference(label) => {
                self.push_text(&format!("[^{}]", single_line(&label)));
            }
            Event::TaskListMarker(checked) => {
                self.buf.push_str(if checked { "[x] " } else { "[ ] " });
            }
            Event::SoftBreak => self.buf.push(' '),
            Event::HardBreak => self.buf.push('\n'),
            Event::Rule => {
                self.flush();
                self.block_gap();
                let (first, _) = self.prefixes();
                let len = self.options.width.saturating_sub(display_width(&first)).max(3);
                let rule = self.paint(&"─".repeat(len), dim());
                self.push_line(format!("{first}{rule}"));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        if self.lines.is_empty() {
            return String::new();
        }
        // Blank first and last rows frame the document like a page.
        let mut out = String::from("\n");
        out.push_str(&self.lines.join("\n"));
        out.push('\n');
        out
    }

    // -----------------------------------------------------------------------
    // Styling
    // -----------------------------------------------------------------------

    fn paint(&self, text: &str, style: ContentStyle) -> String {
        if !self.options.color || text.is_empty() || is_plain(&style) {
            text.to_string()
        } else {
            style.apply(text).to_string()
        }
    }

    fn current_style(&self) -> ContentStyle {
        let mut style = ContentStyle::new();
        for inline in &self.inline {
            match inline {
                Inline::Heading(HeadingLevel::H1) => {
                    style.attributes.set(Attribute::Bold);
                    style.foreground_color = Some(Color::Magenta);
                }
                Inline::Heading(_) => {
                    style.attributes.set(Attribute::Bold);
                    style.foreground_color = Some(Color::Cyan);
                }
                Inline::Strong => style.attributes.set(Attribute::Bold),
                Inline::Emphasis => style.attributes.set(Attribute::Italic),
                Inline::Strikethrough => style.attributes.set(Attribute::CrossedOut),
                Inline::Link { .. } => {
                    style.attributes.set(Attribute::Underlined);
                    style.foreground_color = Some(Color::Blue);
                }
                Inline::Image { .. } => style.attributes.set(Attribute::Dim),
            }
        }
        style
    }

    /// Append text in the current inline style.
    fn push_text(&mut self, text: &str) {
        let style = self.current_style();
        self.push_styled(text, style);
        self.record_link_text(text);
    }

    /// Append text word by word, styling each word separately.
    fn push_styled(&mut self, text: &str, style: ContentStyle) {
        for (i, word) in text.split(' ').enumerate() {
            if i > 0 {
                self.buf.push(' ');
            }
            if !word.is_empty() {
                let painted = self.paint(word, style);
                self.buf.push_str(&painted);
            }
        }
    }

    fn record_link_text(&mut self, text: &str) {
        if let Some(Inline::Link { text: t, .. }) = self
            .inline
            .iter_mut()
            .rev()
            .find(|i| matches!(i, Inline::Link { .. }))
        {
            t.push_str(text);
        }
    }

    // -----------------------------------------------------------------------
    // Lines and prefixes
    // -----------------------------------------------------------------------

    fn push_line(&mut self, line: String) {
        self.last_blank = line.trim().is_empty();
        self.lines.push(line);
    }

    /// Prefix for the first line and the remaining lines of the next block.
    ///
    /// Consumes pending list markers: only the first block of an item gets
    /// the bullet.
    fn prefixes(&mut self) -> (String, String) {
        let mut first = " ".repeat(MARGIN);
        let mut rest = first.clone();
        for block in &mut self.blocks {
            match block {
                Block::Quote { bar } => {
                    first.push_str(bar);
                    rest.push_str(bar);
                }
                Block::Item { marker, pad, used } => {
                    if *used {
                        first.push_str(pad);
                    } else {
                        first.push_str(marker);
                        *used = true;
                    }
                    rest.push_str(pad);
                }
            }
        }
        (first, rest)
    }

    /// Separate blocks with one blank line, except right after a list marker
    /// that has not been printed yet.
    fn block_gap(&mut self) {
        if self.last_blank {
            return;
        }
        let pending_marker = self
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Item { used: false, .. }));
        if pending_marker {
            return;
        }
        let bars: String = self
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Quote { bar } => Some(bar.as_str()),
                Block::Item { .. } => None,
            })
            .collect();
        self.push_line(format!("{}{}", " ".repeat(MARGIN), bars).trim_end().to_string());
        self.last_blank = true;
    }

    /// Word-wrap the inline buffer into output lines.
    fn flush(&mut self) {
        if self.table.is_some() {
            return;
        }
        let text = std::mem::take(&mut self.buf);
        if text.trim().is_empty() {
            return;
        }
        let (first, rest) = self.prefixes();
        let wrap = textwrap::Options::new(self.options.width.max(1))
            .word_splitter(WordSplitter::NoHyphenation)
            .initial_indent(&first)
            .subsequent_indent(&rest);
        let wrapped: Vec<String> = textwrap::wrap(text.trim(), wrap)
            .into_iter()
            .map(|l| l.into_owned())
            .collect();
        for line in wrapped {
            self.push_line(line);
        }
    }

    fn render_table(&mut self, table: Table) {
        let cols = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        if cols == 0 {
            return;
        }
        let mut widths = vec![0usize; cols];
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }

        let (first, rest) = self.prefixes();
        let sep = self.paint("│", dim());
        for (r, row) in table.rows.iter().enumerate() {
            let cells: Vec<String> = (0..cols)
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let align = table.alignments.get(i).copied().unwrap_or(Alignment::None);
                    pad_cell(cell, widths[i], align)
                })
                .collect();
            let prefix = if r == 0 { &first } else { &rest };
            self.push_line(format!(
                "{prefix}{sep} {} {sep}",
                cells.join(&format!(" {sep} "))
            ));
            if r == 0 && table.has_head {
                let rule = widths
                    .iter()
                    .map(|w| "─".repeat(w + 2))
                    .collect::<Vec<_>>()
                    .join("┼");
                let rule = self.paint(&format!("├{rule}┤"), dim());
                self.push_line(format!("{rest}{rule}"));
            }
        }
    }
}

fn pad_cell(cell: &str, width: usize, align: Alignment) -> String {
    let gap = width.saturating_sub(display_width(cell));
    match align {
        Alignment::Right => format!("{}{cell}", " ".repeat(gap)),
        Alignment::Center => {
            let left = gap / 2;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(gap - left))
        }
        Alignment::Left | Alignment::None => format!("{cell}{}", " ".repeat(gap)),
    }
}

fn is_plain(style: &ContentStyle) -> bool {
    style.foreground_color.is_none()
        && style.background_color.is_none()
        && style.attributes.is_empty()
}

fn with_fg(mut style: ContentStyle, color: Color) -> ContentStyle {
    style.foreground_color = Some(color);
    style
}

fn dim() -> ContentStyle {
    with_fg(ContentStyle::new(), Color::DarkGrey)
}

fn marker_style() -> ContentStyle {
    with_fg(ContentStyle::new(), Color::Cyan)
}

fn code_style() -> ContentStyle {
    with_fg(ContentStyle::new(), Color::Green)
}
