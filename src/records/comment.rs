// src/records/comment.rs
use super::{parse_id, text_or, FromRow, Sheet};
use crate::csv::Row;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Format used for comment timestamps with seconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static FALLBACK_SEQ: AtomicI64 = AtomicI64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub author: String,
    pub text: String,
    /// `YYYY-MM-DD HH:MM[:SS]`
    pub timestamp: String,
}

impl FromRow for CommentRecord {
    const SHEET: Sheet = Sheet::Comments;

    fn from_row(row: &Row) -> Self {
        Self {
            id: parse_id(row.get("id")).unwrap_or_else(fallback_id),
            author: text_or(row.get("author"), UNKNOWN_AUTHOR),
            text: text_or(row.get("text"), ""),
            timestamp: match row.get("timestamp") {
                Some(ts) if !ts.is_empty() => ts.to_string(),
                _ => Local::now().format(TIMESTAMP_FORMAT).to_string(),
            },
        }
    }
}

/// Epoch millis nudged by a process-wide counter, so two rows mapped in
/// the same millisecond still get different ids. Not unique across runs.
pub(crate) fn fallback_id() -> i64 {
    Utc::now().timestamp_millis() + FALLBACK_SEQ.fetch_add(1, Ordering::Relaxed)
}
