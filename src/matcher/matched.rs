//! Matched ground truth / predicted graphs and lookups over their node mapping.

use std::collections::{HashMap, HashSet};

use crate::graph::{NodeId, TrackingGraph};

/// Queryable index over a `(gt, pred)` node mapping.
///
/// Lookups return the first match in mapping order. That is only exact when the
/// mapping is one-to-one around the queried node; `gt_match_count` and
/// `pred_match_count` expose how many candidates were skipped.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    gt_to_pred: HashMap<NodeId, NodeId>,
    pred_to_gt: HashMap<NodeId, NodeId>,
    gt_counts: HashMap<NodeId, usize>,
    pred_counts: HashMap<NodeId, usize>,
    pairs: HashSet<(NodeId, NodeId)>,
}

impl MatchIndex {
    pub fn new(mapping: &[(NodeId, NodeId)]) -> Self {
        let mut index = Self::default();
        for &(gt, pred) in mapping {
            index.gt_to_pred.entry(gt).or_insert(pred);
            index.pred_to_gt.entry(pred).or_insert(gt);
            *index.gt_counts.entry(gt).or_default() += 1;
            *index.pred_counts.entry(pred).or_default() += 1;
            index.pairs.insert((gt, pred));
        }
        index
    }

    /// Predicted node matched to `gt`.
    pub fn pred_for(&self, gt: NodeId) -> Option<NodeId> {
        self.gt_to_pred.get(&gt).copied()
    }

    /// Ground truth node matched to `pred`.
    pub fn gt_for(&self, pred: NodeId) -> Option<NodeId> {
        self.pred_to_gt.get(&pred).copied()
    }

    /// Whether `(gt, pred)` appears in the mapping.
    pub fn contains(&self, gt: NodeId, pred: NodeId) -> bool {
        self.pairs.contains(&(gt, pred))
    }

    pub fn gt_match_count(&self, gt: NodeId) -> usize {
        self.gt_counts.get(&gt).copied().unwrap_or(0)
    }

    pub fn pred_match_count(&self, pred: NodeId) -> usize {
        self.pred_counts.get(&pred).copied().unwrap_or(0)
    }
}

/// Ground truth and predicted graphs together with the node mapping between them.
///
/// Owns both graphs; evaluation steps annotate them in place and hand the
/// dataset back to the caller.
#[derive(Debug, Clone)]
pub struct Matched {
    pub(crate) gt_graph: TrackingGraph,
    pub(crate) pred_graph: TrackingGraph,
    mapping: Vec<(NodeId, NodeId)>,
    index: MatchIndex,
}

impl Matched {
    pub fn new(
        gt_graph: TrackingGraph,
        pred_graph: TrackingGraph,
        mapping: Vec<(NodeId, NodeId)>,
    ) -> Self {
        let index = MatchIndex::new(&mapping);
        Self {
            gt_graph,
            pred_graph,
            mapping,
            index,
        }
    }

    pub fn gt_graph(&self) -> &TrackingGraph {
        &self.gt_graph
    }

    pub fn pred_graph(&self) -> &TrackingGraph {
        &self.pred_graph
    }

    pub fn mapping(&self) -> &[(NodeId, NodeId)] {
        &self.mapping
    }

    pub fn index(&self) -> &MatchIndex {
        &self.index
    }

    /// Predicted node matched to a ground truth node.
    pub fn gt_pred_match(&self, gt: NodeId) -> Option<NodeId> {
        self.index.pred_for(gt)
    }

    /// Ground truth node matched to a predicted node.
    pub fn pred_gt_match(&self, pred: NodeId) -> Option<NodeId> {
        self.index.gt_for(pred)
    }

    pub fn into_parts(self) -> (TrackingGraph, TrackingGraph, Vec<(NodeId, NodeId)>) {
        (self.gt_graph, self.pred_graph, self.mapping)
    }
}
