// src/sort.rs
//! Table sorting. Every call returns a fresh `Vec`; inputs are never
//! reordered in place. Sorting is stable in both directions.

use crate::records::{CommentRecord, DonorRecord, LegislationRecord};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, error::Error, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonorField {
    Id,
    Name,
    /// Compares `numeric_amount`, not the display string.
    Amount,
    Party,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegislationField {
    Id,
    BillName,
    Status,
    SponsoredBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentField {
    Id,
    Author,
    Text,
    Timestamp,
}

/// A sort key or direction that did not match any known name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(pub String);

impl fmt::Display for UnknownSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort key {:?}", self.0)
    }
}

impl Error for UnknownSortKey {}

impl FromStr for SortDirection {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

// Field names follow the sheet headers, matched case-insensitively.
impl FromStr for DonorField {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(DonorField::Id),
            "name" => Ok(DonorField::Name),
            "amount" | "numericamount" => Ok(DonorField::Amount),
            "party" => Ok(DonorField::Party),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

impl FromStr for LegislationField {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(LegislationField::Id),
            "billname" | "bill" => Ok(LegislationField::BillName),
            "status" => Ok(LegislationField::Status),
            "sponsoredby" | "sponsor" => Ok(LegislationField::SponsoredBy),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

impl FromStr for CommentField {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(CommentField::Id),
            "author" => Ok(CommentField::Author),
            "text" => Ok(CommentField::Text),
            "timestamp" => Ok(CommentField::Timestamp),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Parse `"field:dir"` (dir optional, ascending by default).
pub fn parse_sort_spec<F>(spec: &str) -> Result<(F, SortDirection), UnknownSortKey>
where
    F: FromStr<Err = UnknownSortKey>,
{
    match spec.split_once(':') {
        Some((field, dir)) => Ok((field.parse()?, dir.parse()?)),
        None => Ok((spec.parse()?, SortDirection::Asc)),
    }
}

fn sorted_by<T, F>(records: &[T], direction: SortDirection, cmp: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let mut out = records.to_vec();
    out.sort_by(|a, b| direction.apply(cmp(a, b)));
    out
}

pub fn sort_donors(
    donors: &[DonorRecord],
    field: DonorField,
    direction: SortDirection,
) -> Vec<DonorRecord> {
    sorted_by(donors, direction, |a, b| match field {
        DonorField::Id => a.id.cmp(&b.id),
        DonorField::Name => a.name.cmp(&b.name),
        DonorField::Amount => a.numeric_amount.total_cmp(&b.numeric_amount),
        DonorField::Party => a.party.cmp(&b.party),
    })
}

pub fn sort_legislation(
    bills: &[LegislationRecord],
    field: LegislationField,
    direction: SortDirection,
) -> Vec<LegislationRecord> {
    sorted_by(bills, direction, |a, b| match field {
        LegislationField::Id => a.id.cmp(&b.id),
        LegislationField::BillName => a.bill_name.cmp(&b.bill_name),
        LegislationField::Status => a.status.cmp(&b.status),
        LegislationField::SponsoredBy => a.sponsored_by.cmp(&b.sponsored_by),
    })
}

pub fn sort_comments(
    comments: &[CommentRecord],
    field: CommentField,
    direction: SortDirection,
) -> Vec<CommentRecord> {
    sorted_by(comments, direction, |a, b| match field {
        CommentField::Id => a.id.cmp(&b.id),
        CommentField::Author => a.author.cmp(&b.author),
        CommentField::Text => a.text.cmp(&b.text),
        CommentField::Timestamp => a.timestamp.cmp(&b.timestamp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donor(id: i64, name: &str, amount: &str, numeric: f64, party: &str) -> DonorRecord {
        DonorRecord {
            id,
            name: name.into(),
            amount: amount.into(),
            numeric_amount: numeric,
            party: party.into(),
        }
    }

    fn donors() -> Vec<DonorRecord> {
        vec![
            donor(1, "Citizens for Progress", "$1.2M", 1_200_000.0, "Democratic"),
            donor(2, "Energy Future PAC", "$950K", 950_000.0, "Republican"),
            donor(3, "Teachers United", "$780K", 780_000.0, "Democratic"),
        ]
    }

    #[test]
    fn amount_sorts_numerically() {
        let input = donors();
        let asc = sort_donors(&input, DonorField::Amount, SortDirection::Asc);
        let amounts: Vec<f64> = asc.iter().map(|d| d.numeric_amount).collect();
        assert_eq!(amounts, vec![780_000.0, 950_000.0, 1_200_000.0]);

        // the display strings alone would order "$1.2M" first
        let desc = sort_donors(&input, DonorField::Amount, SortDirection::Desc);
        assert_eq!(desc[0].amount, "$1.2M");

        // input untouched
        assert_eq!(input, donors());
    }

    #[test]
    fn name_desc_is_reverse_lexicographic() {
        let sorted = sort_donors(&donors(), DonorField::Name, SortDirection::Desc);
        let names: Vec<_> = sorted.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Teachers United", "Energy Future PAC", "Citizens for Progress"]
        );
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let sorted = sort_donors(&donors(), DonorField::Party, SortDirection::Asc);
        let ids: Vec<_> = sorted.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let sorted = sort_donors(&donors(), DonorField::Party, SortDirection::Desc);
        let ids: Vec<_> = sorted.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn legislation_by_status() {
        let bills = vec![
            LegislationRecord {
                id: 1,
                bill_name: "SB 2".into(),
                status: "Pending Vote".into(),
                sponsored_by: "B".into(),
            },
            LegislationRecord {
                id: 2,
                bill_name: "AB 1".into(),
                status: "Failed".into(),
                sponsored_by: "A".into(),
            },
        ];
        let sorted = sort_legislation(&bills, LegislationField::Status, SortDirection::Asc);
        assert_eq!(sorted[0].status, "Failed");
        let sorted = sort_legislation(&bills, LegislationField::BillName, SortDirection::Desc);
        assert_eq!(sorted[0].bill_name, "SB 2");
    }

    #[test]
    fn comments_by_timestamp() {
        let c = |id, ts: &str| CommentRecord {
            id,
            author: "a".into(),
            text: "t".into(),
            timestamp: ts.into(),
        };
        let sorted = sort_comments(
            &[c(1, "2024-05-02 09:00"), c(2, "2024-05-01 10:30:15")],
            CommentField::Timestamp,
            SortDirection::Asc,
        );
        assert_eq!(sorted[0].id, 2);
    }

    #[test]
    fn parses_specs() {
        assert_eq!(
            parse_sort_spec::<DonorField>("amount:desc"),
            Ok((DonorField::Amount, SortDirection::Desc))
        );
        assert_eq!(
            parse_sort_spec::<LegislationField>("billName"),
            Ok((LegislationField::BillName, SortDirection::Asc))
        );
        assert!(parse_sort_spec::<CommentField>("mood:asc").is_err());
        assert!(parse_sort_spec::<DonorField>("name:sideways").is_err());
    }
}
