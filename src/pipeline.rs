//! EvaluationPipeline combining IoU matching with division evaluation.

use serde::{Deserialize, Serialize};

use crate::divisions::{DivisionReport, evaluate_division_events};
use crate::error::Result;
use crate::graph::TrackingGraph;
use crate::matcher::{BoundingBoxOverlap, IouMatcher, IouMatcherConfig, Matched, OverlapFinder};

/// Configuration for a full evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub matcher: IouMatcherConfig,
    /// Largest frame buffer tried when correcting shifted divisions
    pub max_frame_buffer: u32,
}

/// Result of an evaluation run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Annotated graphs and their mapping
    pub matched: Matched,
    pub report: DivisionReport,
}

/// Runs matching and division evaluation on pairs of tracking graphs.
pub struct EvaluationPipeline<F: OverlapFinder = BoundingBoxOverlap> {
    matcher: IouMatcher<F>,
    max_frame_buffer: u32,
}

impl EvaluationPipeline<BoundingBoxOverlap> {
    pub fn new(config: EvaluationConfig) -> Self {
        Self::with_finder(config, BoundingBoxOverlap)
    }

    pub fn with_default_config() -> Self {
        Self::new(EvaluationConfig::default())
    }
}

impl<F: OverlapFinder> EvaluationPipeline<F> {
    /// Create a pipeline that proposes overlap candidates with `finder`.
    pub fn with_finder(config: EvaluationConfig, finder: F) -> Self {
        Self {
            matcher: IouMatcher::with_finder(config.matcher, finder),
            max_frame_buffer: config.max_frame_buffer,
        }
    }

    /// Match `gt` against `pred` and evaluate their division events.
    ///
    /// # Returns
    /// The annotated dataset with its division report, or the first error hit by
    /// matching or evaluation.
    pub fn run(&self, gt: TrackingGraph, pred: TrackingGraph) -> Result<Evaluation> {
        let matched = self.matcher.compute_mapping(gt, pred)?;
        let matched = evaluate_division_events(matched, self.max_frame_buffer)?;
        let report = DivisionReport::collect(&matched);
        Ok(Evaluation { matched, report })
    }
}
