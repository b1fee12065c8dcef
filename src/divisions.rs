//! Division event evaluation.
//!
//! Divisions are first classified at exact frame correspondence, then FP/FN pairs
//! are revisited with increasing frame buffers to find divisions that were only
//! detected a few frames early or late.

mod classify;
mod evaluate;
mod report;
mod shifted;

pub use classify::{DivisionClassification, classify, classify_divisions, same_daughters};
pub use evaluate::evaluate_division_events;
pub use report::{DivisionCounts, DivisionEvents, DivisionReport};
pub use shifted::{correct_shifted_divisions, predecessor_at, successor_at};
