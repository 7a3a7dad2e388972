// src/records/donor.rs
use super::{parse_id, text_or, FromRow, Sheet};
use crate::{amount::to_number, csv::Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorRecord {
    pub id: i64,
    pub name: String,
    /// Display string, kept exactly as the sheet wrote it.
    pub amount: String,
    /// Sort key for `amount`.
    pub numeric_amount: f64,
    pub party: String,
}

impl FromRow for DonorRecord {
    const SHEET: Sheet = Sheet::Donors;

    fn from_row(row: &Row) -> Self {
        let amount = row.get("amount");
        Self {
            id: parse_id(row.get("id")).unwrap_or(0),
            name: text_or(row.get("name"), ""),
            amount: text_or(amount, "$0"),
            numeric_amount: to_number(amount),
            party: text_or(row.get("party"), ""),
        }
    }
}
