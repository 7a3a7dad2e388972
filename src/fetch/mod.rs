// src/fetch/mod.rs

use crate::{
    config::{SheetUrls, SheetsConfig},
    csv::{self, CsvOptions},
    records::{CommentRecord, DonorRecord, FromRow, LegislationRecord},
};
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};
use url::Url;

mod error;

pub use error::FetchError;

const USER_AGENT: &str = concat!("simplegov/", env!("CARGO_PKG_VERSION"));

/// Tokenize `text` and map every accepted row into `T`.
pub fn parse_records<T: FromRow>(text: &str, options: CsvOptions) -> Vec<T> {
    let sheet = csv::parse_with(text, options);
    sheet.rows.iter().map(T::from_row).collect()
}

/// Reads the published sheets. Cheap to clone; every call goes to the
/// network again, nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: Client,
    urls: SheetUrls,
    timeout: Option<Duration>,
    csv: CsvOptions,
}

impl SheetClient {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_client(http, config))
    }

    /// Reuse an existing `reqwest` client.
    pub fn with_client(http: Client, config: &SheetsConfig) -> Self {
        Self {
            http,
            urls: config.sheets.clone(),
            timeout: config.request_timeout(),
            csv: CsvOptions {
                delimiter: config.delimiter,
            },
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn urls(&self) -> &SheetUrls {
        &self.urls
    }

    pub async fn fetch_donors(&self) -> Result<Vec<DonorRecord>, FetchError> {
        self.fetch::<DonorRecord>().await
    }

    pub async fn fetch_legislation(&self) -> Result<Vec<LegislationRecord>, FetchError> {
        self.fetch::<LegislationRecord>().await
    }

    pub async fn fetch_comments(&self) -> Result<Vec<CommentRecord>, FetchError> {
        self.fetch::<CommentRecord>().await
    }

    /// Fetch the configured sheet for `T`.
    pub async fn fetch<T: FromRow>(&self) -> Result<Vec<T>, FetchError> {
        let url = self.urls.get(T::SHEET).clone();
        self.fetch_sheet(&url).await
    }

    /// Like [`SheetClient::fetch`], giving up early once `cancel` fires.
    pub async fn fetch_cancellable<T: FromRow>(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(sheet = %T::SHEET, "fetch cancelled");
                Err(FetchError::Cancelled)
            }
            res = self.fetch::<T>() => res,
        }
    }

    /// GET `url` and map its rows into `T`.
    #[instrument(level = "info", skip(self), fields(sheet = %T::SHEET))]
    pub async fn fetch_sheet<T: FromRow>(&self, url: &Url) -> Result<Vec<T>, FetchError> {
        let text = match self.get_text(url).await {
            Ok(t) => t,
            Err(e) => {
                error!(%url, error = %e, "error fetching sheet");
                return Err(e);
            }
        };

        let records = parse_records::<T>(&text, self.csv);
        info!(count = records.len(), "fetched sheet");
        Ok(records)
    }

    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let request = async {
            debug!("fetching text from {}", url);
            let resp = self.http.get(url.clone()).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }
            Ok::<_, FetchError>(resp.text().await?)
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| FetchError::Timeout(limit))?,
            None => request.await,
        }
    }
}
