//! Baseline classification of division events.

use tracing::{info, warn};

use crate::error::Result;
use crate::graph::{NodeFlag, NodeId};
use crate::matcher::Matched;

/// Flags assigned by one classification pass, before they are written to the graphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DivisionClassification {
    /// Flags for ground truth division nodes
    pub gt: Vec<(NodeId, NodeFlag)>,
    /// Flags for predicted division nodes
    pub pred: Vec<(NodeId, NodeFlag)>,
}

impl DivisionClassification {
    /// Write the flags onto the matched graphs.
    pub fn apply(&self, matched: &mut Matched) -> Result<()> {
        for &(node, flag) in &self.gt {
            matched.gt_graph.set_flag(node, flag)?;
        }
        for &(node, flag) in &self.pred {
            matched.pred_graph.set_flag(node, flag)?;
        }
        Ok(())
    }

    pub fn count(&self, flag: NodeFlag) -> usize {
        self.gt
            .iter()
            .chain(&self.pred)
            .filter(|(_, f)| *f == flag)
            .count()
    }
}

/// Compare two daughter lists as multisets. Unmatched daughters (`None`) count too.
pub fn same_daughters(mut a: Vec<Option<NodeId>>, mut b: Vec<Option<NodeId>>) -> bool {
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

/// Classify every division without touching the graphs.
///
/// Ground truth divisions become TP, WC or FN. Predicted divisions not consumed by a
/// ground truth division become FP.
pub fn classify(matched: &Matched) -> DivisionClassification {
    let gt = matched.gt_graph();
    let pred = matched.pred_graph();

    let mut div_pred = pred.divisions();
    let mut result = DivisionClassification::default();

    for gt_node in gt.divisions() {
        if matched.index().gt_match_count(gt_node) > 1 {
            warn!(node = %gt_node, "Division has several matches, using the first one");
        }

        let pred_node = match matched.gt_pred_match(gt_node) {
            Some(p) => p,
            None => {
                result.gt.push((gt_node, NodeFlag::FnDiv));
                continue;
            }
        };

        let Some(pos) = div_pred.iter().position(|&p| p == pred_node) else {
            result.gt.push((gt_node, NodeFlag::FnDiv));
            continue;
        };

        let succ_gt: Vec<Option<NodeId>> = gt
            .successors(gt_node)
            .into_iter()
            .map(|d| matched.gt_pred_match(d))
            .collect();
        let succ_pred: Vec<Option<NodeId>> =
            pred.successors(pred_node).into_iter().map(Some).collect();

        let flag = if same_daughters(succ_gt, succ_pred) {
            NodeFlag::TpDiv
        } else {
            NodeFlag::WcDiv
        };
        result.gt.push((gt_node, flag));
        result.pred.push((pred_node, flag));

        div_pred.remove(pos);
    }

    result
        .pred
        .extend(div_pred.into_iter().map(|node| (node, NodeFlag::FpDiv)));
    result
}

/// Classify divisions and annotate both graphs in place.
///
/// No-op when both graphs already carry division annotations.
pub fn classify_divisions(matched: &mut Matched) -> Result<()> {
    if matched.gt_graph.division_annotations() && matched.pred_graph.division_annotations() {
        info!("Division annotations already present. Skipping graph annotation.");
        return Ok(());
    }

    let classification = classify(matched);
    classification.apply(matched)?;

    info!(
        tp = classification.count(NodeFlag::TpDiv) / 2,
        fp = classification.count(NodeFlag::FpDiv),
        fn_ = classification.count(NodeFlag::FnDiv),
        wc = classification.count(NodeFlag::WcDiv) / 2,
        "Classified divisions"
    );

    matched.gt_graph.set_division_annotations(true);
    matched.pred_graph.set_division_annotations(true);
    Ok(())
}
