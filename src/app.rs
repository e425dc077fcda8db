//! Command flow: search, then print JSON, pick URLs, or page through articles.

use std::io::Write;

use anyhow::Context;
use log::{info, warn};
use thiserror::Error;

use crate::client::{self, ResultRecord};
use crate::config::Config;
use crate::error::SelectError;
use crate::finder::{self, FinderOptions, Selection};
use crate::markdown::RenderOptions;
use crate::pager::{Pager, PagerOptions};

/// What to do with the search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print all results as one JSON array.
    Json,
    /// Pick one article at a time and read it in the pager, until aborted.
    Preview,
    /// Pick any number of articles and print their URLs.
    Select { open: bool },
}

/// Which stage failed; decides the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Args = 1,
    Request = 2,
    FuzzyFinder = 3,
    Webbrowser = 4,
    Json = 5,
    Preview = 6,
}

#[derive(Error, Debug)]
#[error("{error:#}")]
pub struct AppError {
    pub kind: Failure,
    error: anyhow::Error,
}

impl AppError {
    pub fn new(kind: Failure, error: impl Into<anyhow::Error>) -> Self {
        Self {
            kind,
            error: error.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind as i32
    }
}

trait ResultExt<T> {
    fn or_fail(self, kind: Failure) -> Result<T, AppError>;
}

impl<T, E: Into<anyhow::Error>> ResultExt<T> for Result<T, E> {
    fn or_fail(self, kind: Failure) -> Result<T, AppError> {
        self.map_err(|e| AppError::new(kind, e))
    }
}

/// The interactive side of the program, kept behind a trait so the command
/// flow can run against scripted sessions.
pub trait Frontend {
    fn select_many(&mut self, records: &[ResultRecord]) -> Result<Selection<Vec<usize>>, SelectError>;
    fn select_one(&mut self, records: &[ResultRecord]) -> Result<Selection<usize>, SelectError>;
    fn fetch_article(&mut self, path: &str) -> anyhow::Result<Vec<u8>>;
    /// Run one pager session to completion.
    fn page(&mut self, pager: Pager) -> anyhow::Result<()>;
    fn open_url(&mut self, url: &str) -> anyhow::Result<()>;
}

/// The real terminal, network and browser.
pub struct Terminal {
    pub finder: FinderOptions,
}

impl Frontend for Terminal {
    fn select_many(&mut self, records: &[ResultRecord]) -> Result<Selection<Vec<usize>>, SelectError> {
        finder::select_many(records, &self.finder)
    }

    fn select_one(&mut self, records: &[ResultRecord]) -> Result<Selection<usize>, SelectError> {
        finder::select_one(records, &self.finder)
    }

    fn fetch_article(&mut self, path: &str) -> anyhow::Result<Vec<u8>> {
        client::fetch_article(path)
    }

    fn page(&mut self, pager: Pager) -> anyhow::Result<()> {
        pager.run()
    }

    fn open_url(&mut self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("failed to open the URL {url}"))
    }
}

/// Whether ANSI styling is wanted (`NO_COLOR` unset).
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Search every page from 1 to `config.pages` and run `mode` on the results.
pub fn run(query: &str, mode: Mode, config: &Config) -> Result<(), AppError> {
    let mut records = Vec::new();
    for page in 1..=config.pages {
        let url = client::search_url(query, config.sort, page)
            .context("failed to create search URL")
            .or_fail(Failure::Args)?;
        let found = client::search(&url)
            .context("failed to search articles")
            .or_fail(Failure::Request)?;
        records.extend(found);
    }
    info!("app: {} result(s) for {query:?}", records.len());

    if records.is_empty() {
        eprintln!("no results found");
        return Ok(());
    }

    let color = color_enabled();
    let mut frontend = Terminal {
        finder: FinderOptions {
            preview_margin: config.finder.preview_margin,
            color,
        },
    };
    let pager = PagerOptions {
        render: RenderOptions {
            width: config.pager.render_width,
            color,
        },
        style: config.pager.border,
        wheel_step: config.pager.wheel_step,
    };
    match mode {
        Mode::Json => print_json(&records, &mut std::io::stdout().lock()),
        Mode::Preview => preview_loop(&mut frontend, &records, &pager),
        Mode::Select { open } => {
            select_and_print(&mut frontend, &records, open, &mut std::io::stdout().lock())
        }
    }
}

pub fn print_json(records: &[ResultRecord], out: &mut impl Write) -> Result<(), AppError> {
    let json = serde_json::to_string(records)
        .context("failed to serialize results as JSON")
        .or_fail(Failure::Json)?;
    writeln!(out, "{json}")
        .context("failed to write JSON")
        .or_fail(Failure::Json)
}

/// Multi-select, open each pick in the browser if asked, print each pick's URL.
pub fn select_and_print(
    frontend: &mut impl Frontend,
    records: &[ResultRecord],
    open: bool,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let chosen = match frontend
        .select_many(records)
        .context("an error occurred on fuzzyfinder")
        .or_fail(Failure::FuzzyFinder)?
    {
        Selection::Chosen(chosen) => chosen,
        Selection::Aborted => return Ok(()),
    };
    let urls: Vec<String> = chosen
        .iter()
        .map(|&i| client::page_url(&records[i].link))
        .collect();

    if open {
        for url in &urls {
            frontend.open_url(url).or_fail(Failure::Webbrowser)?;
        }
    }
    for url in &urls {
        writeln!(out, "{url}")
            .context("failed to write URL")
            .or_fail(Failure::FuzzyFinder)?;
    }
    Ok(())
}

/// Pick an article, read it, repeat; an aborted pick ends the loop normally.
///
/// One pager session finishes before the next pick starts. An article whose
/// body cannot be rendered is skipped with a warning.
pub fn preview_loop(
    frontend: &mut impl Frontend,
    records: &[ResultRecord],
    options: &PagerOptions,
) -> Result<(), AppError> {
    loop {
        let index = match frontend
            .select_one(records)
            .context("an error occurred on fuzzyfinder")
            .or_fail(Failure::Preview)?
        {
            Selection::Chosen(index) => index,
            Selection::Aborted => return Ok(()),
        };
        let record = &records[index];

        let body = frontend
            .fetch_article(&record.link)
            .context("failed to fetch the article page")
            .or_fail(Failure::Preview)?;
        let pager = match Pager::new(&record.title, &body, options) {
            Ok(p) => p,
            Err(e) => {
                warn!("app: skipping {:?}: {e}", record.title);
                continue;
            }
        };
        frontend
            .page(pager)
            .context("an error occurred on pager")
            .or_fail(Failure::Preview)?;
    }
}
