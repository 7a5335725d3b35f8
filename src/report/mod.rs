//! Report persistence boundary.
//!
//! The engine never persists verdicts itself; callers build a
//! [`GradeReport`] and hand it to a [`ReportStore`].

pub mod error;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
#[cfg(any(test, feature = "mock"))]
pub use store::MockReportStore;
pub use store::{FileReportStore, REPORTS_FILE, ReportStore};
pub use types::{GradeReport, MAX_EXAM_ID_LEN, validate_exam_id};
