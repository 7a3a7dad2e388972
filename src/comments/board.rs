// src/comments/board.rs
use super::SubmitError;
use crate::records::CommentRecord;
use chrono::Local;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Author used when a local comment is submitted without one.
pub const LOCAL_AUTHOR: &str = "Current User";

/// The comment list shown under the tables: fetched comments followed by
/// anything added this session.
#[derive(Debug, Default)]
pub struct CommentBoard {
    comments: Mutex<Vec<CommentRecord>>,
}

impl CommentBoard {
    pub fn new(initial: Vec<CommentRecord>) -> Self {
        Self {
            comments: Mutex::new(initial),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CommentRecord>> {
        self.comments.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a locally written comment. The id is the board length + 1
    /// and the timestamp is local time to the minute. The id can clash
    /// with ids that came from the sheet.
    pub fn append_local(&self, author: &str, text: &str) -> Result<CommentRecord, SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyComment);
        }
        let author = match author.trim() {
            "" => LOCAL_AUTHOR,
            a => a,
        };

        let mut comments = self.lock();
        let record = CommentRecord {
            id: comments.len() as i64 + 1,
            author: author.to_string(),
            text: text.to_string(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        };
        comments.push(record.clone());
        debug!(id = record.id, "appended local comment");
        Ok(record)
    }

    /// Append a record produced elsewhere, e.g. by a remote sink.
    pub fn push(&self, record: CommentRecord) {
        self.lock().push(record);
    }

    /// Replace the board contents, typically after a re-fetch.
    pub fn replace(&self, comments: Vec<CommentRecord>) {
        *self.lock() = comments;
    }

    pub fn snapshot(&self) -> Vec<CommentRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
