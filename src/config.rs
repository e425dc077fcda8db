use std::path::PathBuf;

use log::{debug, info};
use serde::Deserialize;

use crate::chrome::ChromeStyle;
use crate::client::SortBy;
use crate::finder::DEFAULT_PREVIEW_MARGIN;
use crate::pager::DEFAULT_WHEEL_STEP;

// ---------------------------------------------------------------------------
// ConfigFile: deserialized from TOML (all fields optional)
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub sort: Option<String>,
    pub pages: Option<u32>,
    #[serde(default)]
    pub finder: FinderConfigFile,
    #[serde(default)]
    pub pager: PagerConfigFile,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct FinderConfigFile {
    pub preview_margin: Option<u16>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct PagerConfigFile {
    pub border: Option<String>,
    pub render_width: Option<usize>,
    pub wheel_step: Option<u16>,
}

// ---------------------------------------------------------------------------
// Config: resolved (all fields concrete)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Config {
    pub sort: SortBy,
    pub pages: u32,
    pub finder: FinderConfig,
    pub pager: PagerConfig,
}

#[derive(Debug)]
pub struct FinderConfig {
    pub preview_margin: u16,
}

#[derive(Debug)]
pub struct PagerConfig {
    pub border: ChromeStyle,
    pub render_width: usize,
    pub wheel_step: u16,
}

impl ConfigFile {
    /// Merge CLI values (overwrites non-None fields).
    pub fn merge_cli(&mut self, sort: Option<String>, pages: Option<u32>) {
        if let Some(ref v) = sort {
            debug!("config: CLI override sort={v}");
            self.sort = sort;
        }
        if let Some(v) = pages {
            debug!("config: CLI override pages={v}");
            self.pages = pages;
        }
    }

    /// Resolve to a Config by applying defaults to missing fields.
    ///
    /// Fails on values that are present but unusable (unknown sort key or
    /// border name, page 0).
    pub fn resolve(self) -> anyhow::Result<Config> {
        let sort = match self.sort {
            Some(s) => s.parse()?,
            None => SortBy::default(),
        };
        let pages = self.pages.unwrap_or(1);
        if pages == 0 {
            anyhow::bail!("the page number must be a positive value");
        }
        let border = match self.pager.border {
            Some(b) => b.parse()?,
            None => ChromeStyle::default(),
        };
        let config = Config {
            sort,
            pages,
            finder: FinderConfig {
                preview_margin: self.finder.preview_margin.unwrap_or(DEFAULT_PREVIEW_MARGIN),
            },
            pager: PagerConfig {
                border,
                render_width: self.pager.render_width.unwrap_or(80).max(20),
                wheel_step: self.pager.wheel_step.unwrap_or(DEFAULT_WHEEL_STEP).max(1),
            },
        };
        info!(
            "config: resolved sort={}, pages={}, preview_margin={}, \
             render_width={}, wheel_step={}",
            config.sort,
            config.pages,
            config.finder.preview_margin,
            config.pager.render_width,
            config.pager.wheel_step,
        );
        Ok(config)
    }
}

/// Resolve the XDG config path for qiitaz.
fn config_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(config_dir.join("qiitaz").join("config.toml"))
}

/// Load config file. Returns `ConfigFile::default()` if no file exists.
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config() -> anyhow::Result<ConfigFile> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            info!("config: no HOME or XDG_CONFIG_HOME set, using defaults");
            return Ok(ConfigFile::default());
        }
    };
    debug!("config: looking for {}", path.display());
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            info!("config: loaded from {}", path.display());
            let cfg: ConfigFile = toml::from_str(&text)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("config: {} not found, using defaults", path.display());
            Ok(ConfigFile::default())
        }
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {e}", path.display())),
    }
}
