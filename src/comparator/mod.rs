//! Page-aligned comparison of a candidate answer set against the reference.
//!
//! [`GradingEngine`] owns the reference lifecycle (load / reset) and drives
//! normalize → score → penalize → aggregate across aligned pages.

pub mod engine;
pub mod error;
pub mod state;
pub mod types;


pub use engine::GradingEngine;
pub use error::ComparisonError;
pub use state::ComparatorState;
pub use types::{AnswerSet, PageIndex, ReferenceSet, Verdict};
