//! # lineage-eval
//!
//! Accuracy evaluation of cell-tracking results against ground truth.
//!
//! Ground truth and predicted results are `TrackingGraph`s: one node per object
//! per frame, edges from parent to child, and a labeled segmentation volume.
//! Evaluation runs in two stages:
//!
//! - **Matching**: objects are paired frame by frame when the IoU of their
//!   segmentation masks reaches a threshold (`IouMatcher`, `compute_match`).
//! - **Division evaluation**: every division is classified as true positive,
//!   false positive, false negative or wrong children, and FP/FN divisions that
//!   are only off by a few frames get the smallest frame buffer that makes them
//!   correct (`evaluate_division_events`).
//!
//! ## Example
//!
//! ```rust,ignore
//! use lineage_eval::{EvaluationConfig, EvaluationPipeline};
//!
//! let config = EvaluationConfig { max_frame_buffer: 2, ..Default::default() };
//! let eval = EvaluationPipeline::new(config).run(gt_graph, pred_graph)?;
//! println!("{:?}", eval.report.counts_at_buffer(2));
//! ```

pub mod divisions;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod pipeline;

pub use divisions::{DivisionCounts, DivisionReport, evaluate_division_events};
pub use error::{Error, Result};
pub use graph::{NodeAttrs, NodeFlag, NodeId, TrackingGraph, TrackingGraphBuilder};
pub use matcher::{
    BoundingBoxOverlap, IouMatcher, IouMatcherConfig, MatchIndex, Matched, OverlapCandidates,
    OverlapFinder, compute_match,
};
pub use pipeline::{Evaluation, EvaluationConfig, EvaluationPipeline};
