// src/comments/form.rs
use super::{utc_timestamp, SubmitError};
use crate::records::CommentRecord;
use chrono::Utc;
use reqwest::Client;
use tracing::{error, info};
use url::Url;

/// Posts comments to a form endpoint as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone)]
pub struct FormSink {
    http: Client,
    url: Url,
    author_entry: String,
    text_entry: String,
}

impl FormSink {
    pub fn new(http: Client, url: Url, author_entry: String, text_entry: String) -> Self {
        Self {
            http,
            url,
            author_entry,
            text_entry,
        }
    }

    /// The form endpoint answers with an HTML page, so the returned record
    /// is built locally: epoch-millis id and the current UTC time.
    pub async fn submit(&self, author: &str, text: &str) -> Result<CommentRecord, SubmitError> {
        let resp = self
            .http
            .post(self.url.clone())
            .form(&[
                (self.author_entry.as_str(), author),
                (self.text_entry.as_str(), text),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(url = %self.url, %status, "form submission rejected");
            return Err(SubmitError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        info!(url = %self.url, "comment submitted via form");
        Ok(CommentRecord {
            id: Utc::now().timestamp_millis(),
            author: author.to_string(),
            text: text.to_string(),
            timestamp: utc_timestamp(),
        })
    }
}
