//! # Reporting
//!
//! Persistence and presentation of accounted intervals. The accountant
//! itself never performs I/O; the binary feeds its records through here.

pub mod csv_report;
pub mod summary;

pub use csv_report::{profile_rows, CsvReport, CsvRow, Delimiter};
pub use summary::{IntervalSummary, TotalsSummary};
