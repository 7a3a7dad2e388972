// src/records/mod.rs
//! Typed records built from parsed sheet rows.
//!
//! Every mapper is total: missing or malformed fields fall back to a fixed
//! default so one bad cell never costs the whole row.

use crate::csv::Row;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod comment;
pub mod donor;
pub mod legislation;

pub use comment::CommentRecord;
pub use donor::DonorRecord;
pub use legislation::{BillStatus, LegislationRecord};

/// The three published sheets the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sheet {
    Donors,
    Legislation,
    Comments,
}

impl Sheet {
    pub fn as_str(self) -> &'static str {
        match self {
            Sheet::Donors => "donors",
            Sheet::Legislation => "legislation",
            Sheet::Comments => "comments",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a record from one sheet row. Never fails.
pub trait FromRow: Sized {
    const SHEET: Sheet;

    fn from_row(row: &Row) -> Self;
}

static INT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?\d+").expect("integer prefix regex should be valid"));

/// Leading base-10 integer of `s`, so `"12abc"` reads as 12.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    INT_PREFIX
        .find(s)
        .and_then(|m| m.as_str().trim().parse::<i64>().ok())
}

/// Sheet identifier, `None` when missing, unreadable or zero.
pub(crate) fn parse_id(value: Option<&str>) -> Option<i64> {
    value.and_then(parse_int_prefix).filter(|id| *id != 0)
}

/// Owned copy of `value`, or `fallback` when it is missing or empty.
pub(crate) fn text_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
