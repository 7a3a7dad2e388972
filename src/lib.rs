// src/lib.rs
pub mod amount;
pub mod comments;
pub mod config;
pub mod csv;
pub mod dashboard;
pub mod fetch;
pub mod records;
pub mod sort;

pub use config::SheetsConfig;
pub use dashboard::{Dashboard, SheetState};
pub use fetch::{FetchError, SheetClient};
