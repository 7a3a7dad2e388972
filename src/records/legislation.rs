// src/records/legislation.rs
use super::{parse_id, text_or, FromRow, Sheet};
use crate::csv::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationRecord {
    pub id: i64,
    pub bill_name: String,
    pub status: String,
    pub sponsored_by: String,
}

impl LegislationRecord {
    pub fn status_kind(&self) -> BillStatus {
        BillStatus::from(self.status.as_str())
    }
}

impl FromRow for LegislationRecord {
    const SHEET: Sheet = Sheet::Legislation;

    fn from_row(row: &Row) -> Self {
        Self {
            id: parse_id(row.get("id")).unwrap_or(0),
            bill_name: text_or(row.get("billName"), ""),
            status: text_or(row.get("status"), ""),
            sponsored_by: text_or(row.get("sponsoredBy"), ""),
        }
    }
}

/// Known bill stages. Anything else is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BillStatus {
    Passed,
    Failed,
    InCommittee,
    PendingVote,
    Other(String),
}

impl From<&str> for BillStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "passed" => BillStatus::Passed,
            "failed" => BillStatus::Failed,
            "in committee" => BillStatus::InCommittee,
            "pending vote" => BillStatus::PendingVote,
            _ => BillStatus::Other(s.to_string()),
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillStatus::Passed => f.write_str("Passed"),
            BillStatus::Failed => f.write_str("Failed"),
            BillStatus::InCommittee => f.write_str("In Committee"),
            BillStatus::PendingVote => f.write_str("Pending Vote"),
            BillStatus::Other(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse;

    #[test]
    fn maps_row() {
        let sheet = parse("id,billName,status,sponsoredBy\n4,SB 100,In Committee,Sen. Smith");
        let bill = LegislationRecord::from_row(&sheet.rows[0]);
        assert_eq!(bill.id, 4);
        assert_eq!(bill.bill_name, "SB 100");
        assert_eq!(bill.sponsored_by, "Sen. Smith");
        assert_eq!(bill.status_kind(), BillStatus::InCommittee);
    }

    #[test]
    fn missing_columns_are_empty() {
        let sheet = parse("id,billName\n,AB 5");
        let bill = LegislationRecord::from_row(&sheet.rows[0]);
        assert_eq!(bill.id, 0);
        assert_eq!(bill.status, "");
        assert_eq!(bill.sponsored_by, "");
    }

    #[test]
    fn status_kinds() {
        assert_eq!(BillStatus::from("passed"), BillStatus::Passed);
        assert_eq!(BillStatus::from(" Failed "), BillStatus::Failed);
        assert_eq!(BillStatus::from("Pending Vote"), BillStatus::PendingVote);
        assert_eq!(
            BillStatus::from("Vetoed"),
            BillStatus::Other("Vetoed".to_string())
        );
        assert_eq!(BillStatus::InCommittee.to_string(), "In Committee");
    }
}
