// src/config.rs
use crate::{csv::Delimiter, records::Sheet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};
use tracing::{debug, info};
use url::Url;

pub const ENV_CONFIG_PATH: &str = "SIMPLEGOV_CONFIG";
pub const ENV_DONORS_URL: &str = "SIMPLEGOV_DONORS_URL";
pub const ENV_LEGISLATION_URL: &str = "SIMPLEGOV_LEGISLATION_URL";
pub const ENV_COMMENTS_URL: &str = "SIMPLEGOV_COMMENTS_URL";
pub const ENV_TIMEOUT_SECS: &str = "SIMPLEGOV_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Published CSV export URL for each sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetUrls {
    pub donors: Url,
    pub legislation: Url,
    pub comments: Url,
}

impl SheetUrls {
    pub fn get(&self, sheet: Sheet) -> &Url {
        match sheet {
            Sheet::Donors => &self.donors,
            Sheet::Legislation => &self.legislation,
            Sheet::Comments => &self.comments,
        }
    }
}

/// Where newly written comments go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentSinkConfig {
    /// Keep comments in memory only.
    #[default]
    Local,
    /// Form-encoded POST with one field per entry id.
    Form {
        url: Url,
        author_entry: String,
        text_entry: String,
    },
    /// JSON POST to a script endpoint.
    Script { url: Url },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub sheets: SheetUrls,
    /// Per-request limit in seconds, `0` disables it.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub comment_sink: CommentSinkConfig,
}

impl SheetsConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing sheets config YAML")
    }

    /// Read `path`, then apply `SIMPLEGOV_*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config = Self::from_yaml_str(&text)
            .with_context(|| format!("loading config from {}", path.display()))?;
        config.apply_overrides(|key| env::var(key).ok())?;
        info!(path = %path.display(), sink = ?config.comment_sink, "loaded config");
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, sheet) in [
            (ENV_DONORS_URL, Sheet::Donors),
            (ENV_LEGISLATION_URL, Sheet::Legislation),
            (ENV_COMMENTS_URL, Sheet::Comments),
        ] {
            if let Some(raw) = lookup(key) {
                let url = Url::parse(raw.trim())
                    .with_context(|| format!("{} is not a valid URL: {}", key, raw))?;
                debug!(%sheet, %url, "url override");
                match sheet {
                    Sheet::Donors => self.sheets.donors = url,
                    Sheet::Legislation => self.sheets.legislation = url,
                    Sheet::Comments => self.sheets.comments = url,
                }
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number: {}", ENV_TIMEOUT_SECS, raw))?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
