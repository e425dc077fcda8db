//! Qiita search client: URL construction, result page scraping, article fetch.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

use crate::sanitize::single_line;

const BASE_URL: &str = "https://qiita.com";

/// One search hit as scraped from the result page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub header: String,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub tags: Vec<String>,
}

/// Sort key accepted by the search page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Rel,
    Like,
    Stock,
    Created,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Rel => "rel",
            SortBy::Like => "like",
            SortBy::Stock => "stock",
            SortBy::Created => "created",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "rel" => Ok(SortBy::Rel),
            "like" => Ok(SortBy::Like),
            "stock" => Ok(SortBy::Stock),
            "created" => Ok(SortBy::Created),
            other => bail!("invalid sort key: {other}"),
        }
    }
}

/// Build the search page URL for one result page (1-based).
pub fn search_url(query: &str, sort: SortBy, page: u32) -> Result<String> {
    if page == 0 {
        bail!("the page number must be a positive value");
    }
    let mut url = Url::parse(BASE_URL)?.join("search")?;
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("sort", sort.as_str())
        .append_pair("page", &page.to_string());
    Ok(url.into())
}

/// Absolute article URL for a result link path such as `/user/items/abc`.
pub fn page_url(path: &str) -> String {
    let mut url = match Url::parse(BASE_URL) {
        Ok(u) => u,
        Err(_) => return format!("{BASE_URL}{path}"),
    };
    url.set_path(path);
    url.into()
}

fn markdown_url(path: &str) -> String {
    format!("{}.md", page_url(path))
}

/// Fetch one search result page and scrape its hits.
pub fn search(url: &str) -> Result<Vec<ResultRecord>> {
    info!("client: GET {url}");
    let html = ureq::get(url)
        .call()
        .with_context(|| format!("failed to fetch the page {url}"))?
        .body_mut()
        .read_to_string()
        .with_context(|| format!("failed to read the page {url}"))?;
    let results = parse_results(&html);
    info!("client: {} result(s) from {url}", results.len());
    Ok(results)
}

/// Fetch the raw Markdown body of an article.
pub fn fetch_article(path: &str) -> Result<Vec<u8>> {
    let url = markdown_url(path);
    info!("client: GET {url}");
    let body = ureq::get(&url)
        .call()
        .with_context(|| format!("failed to fetch the page ({url})"))?
        .body_mut()
        .read_to_vec()
        .context("failed to read response body")?;
    debug!("client: {} bytes from {url}", body.len());
    Ok(body)
}

/// Selectors for the search result markup.
struct ResultSelectors {
    item: Selector,
    header: Selector,
    title: Selector,
    snippet: Selector,
    tag: Selector,
}

impl ResultSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            item: Selector::parse("div.searchResult_main").ok()?,
            header: Selector::parse("div.searchResult_header").ok()?,
            title: Selector::parse("h1.searchResult_itemTitle a").ok()?,
            snippet: Selector::parse("div.searchResult_snippet").ok()?,
            tag: Selector::parse("li.tagList_item a").ok()?,
        })
    }
}

/// Element text as one clean line (markup whitespace and control
/// characters removed).
fn text_of(element: Option<ElementRef>) -> String {
    element
        .map(|e| single_line(&e.text().collect::<String>()))
        .unwrap_or_default()
}

/// Extract result records from a search result page, in page order.
pub fn parse_results(html: &str) -> Vec<ResultRecord> {
    let Some(sel) = ResultSelectors::new() else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&sel.item)
        .map(|item| {
            let title = item.select(&sel.title).next();
            ResultRecord {
                header: text_of(item.select(&sel.header).next()),
                title: text_of(title),
                link: title
                    .and_then(|t| t.value().attr("href"))
                    .map(single_line)
                    .unwrap_or_default(),
                snippet: text_of(item.select(&sel.snippet).next()),
                tags: item
                    .select(&sel.tag)
                    .map(|a| text_of(Some(a)))
                    .filter(|t| !t.is_empty())
                    .collect(),
            }
        })
        .collect()
}
