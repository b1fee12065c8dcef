//! Frame-buffer correction of divisions detected a few frames early or late.

use tracing::{debug, warn};

use crate::divisions::classify::same_daughters;
use crate::error::{Error, Result};
use crate::graph::{NodeFlag, NodeId, TrackingGraph};
use crate::matcher::Matched;

/// Walk `delta` frames back along single-predecessor links.
///
/// Returns `Ok(None)` when the lineage starts before reaching the target frame and
/// fails with `MergeDetected` on a node with more than one predecessor.
pub fn predecessor_at(graph: &TrackingGraph, node: NodeId, delta: u32) -> Result<Option<NodeId>> {
    let mut current = node;
    for _ in 0..delta {
        match graph.predecessors(current).as_slice() {
            [] => return Ok(None),
            [parent] => current = *parent,
            _ => return Err(Error::MergeDetected(current)),
        }
    }
    Ok(Some(current))
}

/// Walk `delta` frames forward along single-successor links.
///
/// Returns `None` if the lineage ends or divides again before the target frame.
pub fn successor_at(graph: &TrackingGraph, node: NodeId, delta: u32) -> Option<NodeId> {
    let mut current = node;
    for _ in 0..delta {
        match graph.successors(current).as_slice() {
            [child] => current = *child,
            _ => return None,
        }
    }
    Some(current)
}

/// Whether the FP division `fp` and the FN division `fn_node` describe the same
/// event shifted by at most `n_frames`.
fn is_shifted_match(matched: &Matched, fp: NodeId, fn_node: NodeId, n_frames: u32) -> Result<bool> {
    let gt = matched.gt_graph();
    let pred = matched.pred_graph();

    let t_fp = pred.frame(fp)?;
    let t_fn = gt.frame(fn_node)?;
    let delta = t_fp.abs_diff(t_fn);
    if delta == 0 || delta > n_frames {
        return Ok(false);
    }

    let (fp_daughters, fn_daughters) = if t_fp < t_fn {
        // Predicted division came early: its parent side must match the
        // ground truth ancestor of the late division
        let Some(ancestor) = predecessor_at(gt, fn_node, delta)? else {
            return Ok(false);
        };
        if !matched.index().contains(ancestor, fp) {
            return Ok(false);
        }
        if matched.index().gt_match_count(ancestor) > 1 {
            warn!(node = %ancestor, "Shifted division ancestor has several matches");
        }

        let fp_daughters: Vec<Option<NodeId>> = pred
            .successors(fp)
            .into_iter()
            .map(|d| successor_at(pred, d, delta))
            .collect();
        let fn_daughters: Vec<Option<NodeId>> = gt
            .successors(fn_node)
            .into_iter()
            .map(|d| matched.gt_pred_match(d))
            .collect();
        (fp_daughters, fn_daughters)
    } else {
        let Some(ancestor) = predecessor_at(pred, fp, delta)? else {
            return Ok(false);
        };
        if !matched.index().contains(fn_node, ancestor) {
            return Ok(false);
        }
        if matched.index().pred_match_count(ancestor) > 1 {
            warn!(node = %ancestor, "Shifted division ancestor has several matches");
        }

        let fp_daughters: Vec<Option<NodeId>> = pred
            .successors(fp)
            .into_iter()
            .map(|d| matched.pred_gt_match(d))
            .collect();
        let fn_daughters: Vec<Option<NodeId>> = gt
            .successors(fn_node)
            .into_iter()
            .map(|d| successor_at(gt, d, delta))
            .collect();
        (fp_daughters, fn_daughters)
    };

    Ok(same_daughters(fp_daughters, fn_daughters))
}

/// Record `n_frames` as `min_buffer_correct` on every FP/FN division pair that
/// becomes correct when divisions may be shifted by up to `n_frames`.
///
/// Nodes that already carry a value were resolved by a smaller buffer and are
/// skipped, so calling this for increasing `n_frames` keeps the minimum. Returns
/// the `(gt, pred)` pairs corrected by this call.
pub fn correct_shifted_divisions(
    matched: &mut Matched,
    n_frames: u32,
) -> Result<Vec<(NodeId, NodeId)>> {
    let fp_divs = matched.pred_graph().nodes_with_flag(NodeFlag::FpDiv);
    let fn_divs = matched.gt_graph().nodes_with_flag(NodeFlag::FnDiv);

    let mut corrected = Vec::new();
    for &fp in &fp_divs {
        for &fn_node in &fn_divs {
            if matched.pred_graph().min_buffer_correct(fp)?.is_some()
                || matched.gt_graph().min_buffer_correct(fn_node)?.is_some()
            {
                continue;
            }

            if is_shifted_match(matched, fp, fn_node, n_frames)? {
                matched.gt_graph.set_min_buffer_correct(fn_node, Some(n_frames))?;
                matched.pred_graph.set_min_buffer_correct(fp, Some(n_frames))?;
                corrected.push((fn_node, fp));
            }
        }
    }

    debug!(n_frames, corrected = corrected.len(), "Corrected shifted divisions");
    Ok(corrected)
}
