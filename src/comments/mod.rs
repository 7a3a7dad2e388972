// src/comments/mod.rs
//! Comment submission. One sink is active at a time, picked from config;
//! whatever it accepts is also appended to the shared [`CommentBoard`].

use crate::{config::CommentSinkConfig, records::comment::TIMESTAMP_FORMAT, records::CommentRecord};
use chrono::Utc;
use reqwest::Client;
use std::{error::Error, fmt, sync::Arc};
use tracing::instrument;

mod board;
mod form;
mod script;

pub use board::{CommentBoard, LOCAL_AUTHOR};
pub use form::FormSink;
pub use script::ScriptSink;

#[derive(Debug)]
pub enum SubmitError {
    /// Nothing but whitespace was written.
    EmptyComment,
    Status {
        status: u16,
        message: String,
        body: String,
    },
    Transport(reqwest::Error),
    /// The script endpoint answered with something other than JSON.
    InvalidReply(serde_json::Error),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyComment => f.write_str("comment text is empty"),
            SubmitError::Status {
                status,
                message,
                body,
            } => write!(f, "HTTP {} {} - {}", status, message, body),
            SubmitError::Transport(e) => write!(f, "transport error: {}", e),
            SubmitError::InvalidReply(e) => write!(f, "invalid reply: {}", e),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SubmitError::Transport(e) => Some(e),
            SubmitError::InvalidReply(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        SubmitError::Transport(e)
    }
}

pub(crate) fn utc_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone)]
enum Backend {
    Local,
    Form(FormSink),
    Script(ScriptSink),
}

/// The active comment sink plus the board it feeds.
#[derive(Debug, Clone)]
pub struct CommentSink {
    backend: Backend,
    board: Arc<CommentBoard>,
}

impl CommentSink {
    pub fn local(board: Arc<CommentBoard>) -> Self {
        Self {
            backend: Backend::Local,
            board,
        }
    }

    pub fn form(sink: FormSink, board: Arc<CommentBoard>) -> Self {
        Self {
            backend: Backend::Form(sink),
            board,
        }
    }

    pub fn script(sink: ScriptSink, board: Arc<CommentBoard>) -> Self {
        Self {
            backend: Backend::Script(sink),
            board,
        }
    }

    pub fn from_config(config: &CommentSinkConfig, http: Client, board: Arc<CommentBoard>) -> Self {
        match config {
            CommentSinkConfig::Local => Self::local(board),
            CommentSinkConfig::Form {
                url,
                author_entry,
                text_entry,
            } => Self::form(
                FormSink::new(http, url.clone(), author_entry.clone(), text_entry.clone()),
                board,
            ),
            CommentSinkConfig::Script { url } => {
                Self::script(ScriptSink::new(http, url.clone()), board)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.backend {
            Backend::Local => "local",
            Backend::Form(_) => "form",
            Backend::Script(_) => "script",
        }
    }

    pub fn board(&self) -> &Arc<CommentBoard> {
        &self.board
    }

    /// Submit one comment. Blank text is rejected before anything is sent.
    #[instrument(level = "info", skip(self, text), fields(sink = self.kind()))]
    pub async fn submit(&self, author: &str, text: &str) -> Result<CommentRecord, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyComment);
        }

        let record = match &self.backend {
            Backend::Local => return self.board.append_local(author, text),
            Backend::Form(sink) => sink.submit(author, text).await?,
            Backend::Script(sink) => sink.submit(author, text).await?,
        };
        self.board.push(record.clone());
        Ok(record)
    }
}
