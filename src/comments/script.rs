// src/comments/script.rs
use super::{utc_timestamp, SubmitError};
use crate::records::{parse_int_prefix, CommentRecord};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

#[derive(Serialize)]
struct AddComment<'a> {
    action: &'a str,
    author: &'a str,
    text: &'a str,
}

/// What the script sends back. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ScriptReply {
    id: Option<Value>,
    author: Option<String>,
    text: Option<String>,
    timestamp: Option<String>,
}

/// Posts comments as JSON to a script endpoint that stores them and
/// echoes the stored comment back.
#[derive(Debug, Clone)]
pub struct ScriptSink {
    http: Client,
    url: Url,
}

impl ScriptSink {
    pub fn new(http: Client, url: Url) -> Self {
        Self { http, url }
    }

    pub async fn submit(&self, author: &str, text: &str) -> Result<CommentRecord, SubmitError> {
        let resp = self
            .http
            .post(self.url.clone())
            .json(&AddComment {
                action: "addComment",
                author,
                text,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            error!(url = %self.url, %status, body = %body, "script rejected comment");
            return Err(SubmitError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let reply: ScriptReply = serde_json::from_str(&body).map_err(SubmitError::InvalidReply)?;
        info!(url = %self.url, "comment submitted via script");
        Ok(reply.into_record(author, text))
    }
}

impl ScriptReply {
    fn into_record(self, author: &str, text: &str) -> CommentRecord {
        let id = match &self.id {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => parse_int_prefix(s),
            _ => None,
        }
        .filter(|id| *id != 0)
        .unwrap_or_else(|| {
            warn!(id = ?self.id, "script reply has no usable id");
            Utc::now().timestamp_millis()
        });

        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        CommentRecord {
            id,
            author: non_empty(self.author).unwrap_or_else(|| author.to_string()),
            text: non_empty(self.text).unwrap_or_else(|| text.to_string()),
            timestamp: non_empty(self.timestamp).unwrap_or_else(utc_timestamp),
        }
    }
}
