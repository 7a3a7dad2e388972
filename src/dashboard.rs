// src/dashboard.rs
use crate::{
    comments::CommentBoard,
    fetch::{FetchError, SheetClient},
    records::{CommentRecord, DonorRecord, LegislationRecord, Sheet},
    sort::{self, DonorField, LegislationField, SortDirection},
};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of loading one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum SheetState<T> {
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> SheetState<T> {
    fn from_result(sheet: Sheet, res: Result<Vec<T>, FetchError>) -> Self {
        match res {
            Ok(records) => SheetState::Loaded(records),
            Err(e) => {
                debug!(%sheet, "marking sheet failed");
                SheetState::Failed(format!("failed to fetch {}: {}", sheet, e))
            }
        }
    }

    /// Loaded records, empty when the sheet failed.
    pub fn records(&self) -> &[T] {
        match self {
            SheetState::Loaded(r) => r,
            SheetState::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SheetState::Loaded(_) => None,
            SheetState::Failed(e) => Some(e),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SheetState::Loaded(_))
    }
}

/// All three tables, each loaded or failed on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub donors: SheetState<DonorRecord>,
    pub legislation: SheetState<LegislationRecord>,
    pub comments: SheetState<CommentRecord>,
}

impl Dashboard {
    /// Fetch every sheet concurrently.
    pub async fn load(client: &SheetClient) -> Self {
        let (donors, legislation, comments) = tokio::join!(
            client.fetch_donors(),
            client.fetch_legislation(),
            client.fetch_comments(),
        );

        let dashboard = Self {
            donors: SheetState::from_result(Sheet::Donors, donors),
            legislation: SheetState::from_result(Sheet::Legislation, legislation),
            comments: SheetState::from_result(Sheet::Comments, comments),
        };
        info!(
            donors = dashboard.donors.records().len(),
            legislation = dashboard.legislation.records().len(),
            comments = dashboard.comments.records().len(),
            complete = dashboard.is_complete(),
            "dashboard loaded"
        );
        dashboard
    }

    pub fn is_complete(&self) -> bool {
        self.donors.is_loaded() && self.legislation.is_loaded() && self.comments.is_loaded()
    }

    /// Replace the donor table with a sorted copy. No-op if it failed.
    pub fn sort_donors(&mut self, field: DonorField, direction: SortDirection) {
        if let SheetState::Loaded(records) = &self.donors {
            self.donors = SheetState::Loaded(sort::sort_donors(records, field, direction));
        }
    }

    pub fn sort_legislation(&mut self, field: LegislationField, direction: SortDirection) {
        if let SheetState::Loaded(records) = &self.legislation {
            self.legislation =
                SheetState::Loaded(sort::sort_legislation(records, field, direction));
        }
    }

    /// Start a comment board seeded with the fetched comments.
    pub fn comment_board(&self) -> CommentBoard {
        CommentBoard::new(self.comments.records().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{CommentSinkConfig, SheetUrls, SheetsConfig},
        csv::Delimiter,
    };
    use anyhow::Result;
    use mockito::Server;
    use url::Url;

    fn config_for(base: &str) -> SheetsConfig {
        let url = |path: &str| Url::parse(&format!("{}/{}", base, path)).unwrap();
        SheetsConfig {
            sheets: SheetUrls {
                donors: url("donors.csv"),
                legislation: url("legislation.csv"),
                comments: url("comments.csv"),
            },
            request_timeout_secs: 5,
            delimiter: Delimiter::Comma,
            comment_sink: CommentSinkConfig::Local,
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_hide_the_others() -> Result<()> {
        let mut server = Server::new_async().await;
        let _donors = server
            .mock("GET", "/donors.csv")
            .with_status(200)
            .with_body("id,name,amount,party\n1,A,$1.2M,D\n2,B,$950K,R\n3,C,$780K,D\n")
            .create_async()
            .await;
        let _legislation = server
            .mock("GET", "/legislation.csv")
            .with_status(503)
            .create_async()
            .await;
        let _comments = server
            .mock("GET", "/comments.csv")
            .with_status(200)
            .with_body("id,author,text,timestamp\n1,Ana,hi,2024-05-01 10:30\n")
            .create_async()
            .await;

        let client = SheetClient::new(&config_for(&server.url()))?;
        let mut dash = Dashboard::load(&client).await;

        assert!(!dash.is_complete());
        assert_eq!(dash.donors.records().len(), 3);
        assert!(dash.legislation.records().is_empty());
        assert!(dash.legislation.error().unwrap().contains("503"));
        assert_eq!(dash.comments.records()[0].author, "Ana");

        dash.sort_donors(DonorField::Amount, SortDirection::Asc);
        let names: Vec<_> = dash.donors.records().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);

        // sorting a failed table leaves it failed
        dash.sort_legislation(LegislationField::Status, SortDirection::Asc);
        assert!(!dash.legislation.is_loaded());

        let board = dash.comment_board();
        board.append_local("Me", "new one").unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(dash.comments.records().len(), 1);

        let json = serde_json::to_value(&dash)?;
        assert_eq!(json["donors"]["state"], "loaded");
        assert_eq!(json["legislation"]["state"], "failed");
        Ok(())
    }
}
