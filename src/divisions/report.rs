//! Listing of classified division events read back from annotated graphs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::{NodeFlag, NodeId, TrackingGraph};
use crate::matcher::Matched;

/// Division nodes per outcome, for one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionEvents {
    pub true_positives: Vec<NodeId>,
    pub false_positives: Vec<NodeId>,
    pub false_negatives: Vec<NodeId>,
    pub wrong_children: Vec<NodeId>,
    /// Smallest frame buffer correcting each FP/FN division that has one
    pub min_buffer_correct: BTreeMap<NodeId, u32>,
}

impl DivisionEvents {
    fn collect(graph: &TrackingGraph) -> Self {
        let mut events = Self::default();
        for node in graph.nodes() {
            let Ok(attrs) = graph.attrs(node) else {
                continue;
            };
            for flag in &attrs.flags {
                let bucket = match flag {
                    NodeFlag::TpDiv => &mut events.true_positives,
                    NodeFlag::FpDiv => &mut events.false_positives,
                    NodeFlag::FnDiv => &mut events.false_negatives,
                    NodeFlag::WcDiv => &mut events.wrong_children,
                };
                bucket.push(node);
            }
            if let Some(buffer) = attrs.min_buffer_correct {
                events.min_buffer_correct.insert(node, buffer);
            }
        }
        events
    }

    /// Number of `nodes` corrected at or below `frame_buffer`.
    fn corrected_within(&self, nodes: &[NodeId], frame_buffer: u32) -> usize {
        nodes
            .iter()
            .filter_map(|n| self.min_buffer_correct.get(n))
            .filter(|&&b| b <= frame_buffer)
            .count()
    }
}

/// Division event counts at a given frame buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub wrong_children: usize,
}

/// Division outcomes of an evaluated `Matched` dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionReport {
    pub gt: DivisionEvents,
    pub pred: DivisionEvents,
}

impl DivisionReport {
    pub fn collect(matched: &Matched) -> Self {
        Self {
            gt: DivisionEvents::collect(matched.gt_graph()),
            pred: DivisionEvents::collect(matched.pred_graph()),
        }
    }

    /// Counts when divisions shifted by at most `frame_buffer` frames count as correct.
    ///
    /// Each corrected FN/FP pair turns into one true positive.
    pub fn counts_at_buffer(&self, frame_buffer: u32) -> DivisionCounts {
        let fixed_fn = self.gt.corrected_within(&self.gt.false_negatives, frame_buffer);
        let fixed_fp = self.pred.corrected_within(&self.pred.false_positives, frame_buffer);
        DivisionCounts {
            true_positives: self.gt.true_positives.len() + fixed_fn,
            false_positives: self.pred.false_positives.len().saturating_sub(fixed_fp),
            false_negatives: self.gt.false_negatives.len().saturating_sub(fixed_fn),
            wrong_children: self.gt.wrong_children.len(),
        }
    }
}
