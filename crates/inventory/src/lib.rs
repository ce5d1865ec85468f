//! Inventory ledger: item quantities, JSON persistence and reporting.
//!
//! The [`Ledger`] is plain in-memory state passed explicitly to callers; the
//! [`JsonStore`] moves it to and from a flat JSON file. Every operation logs
//! through `tracing` and reports its outcome as a `Result`.

pub mod ledger;
pub mod report;
pub mod store;

pub use ledger::{AuditLog, DEFAULT_LOW_STOCK_THRESHOLD, Ledger, Removal};
pub use report::{REPORT_HEADER, print_report, write_report};
pub use store::{DEFAULT_DATA_PATH, JsonStore, LoadOutcome, StoreError};
