//! IoU-based node matching between ground truth and predicted tracking graphs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ndarray::{Array2, ArrayViewD, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{NodeId, TrackingGraph};
use crate::matcher::assignment::max_iou_assignment;
use crate::matcher::matched::Matched;
use crate::matcher::overlap::{BoundingBoxOverlap, OverlapCandidates, OverlapFinder};

/// Configuration for the IoU matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IouMatcherConfig {
    /// Minimum IoU for two objects to match. 1.0 suits identical segmentations,
    /// 0.6-0.8 tolerates imperfect predictions.
    pub iou_threshold: f64,
    /// Reduce each frame's matches to a one-to-one assignment maximizing IoU.
    pub one_to_one: bool,
}

impl Default for IouMatcherConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.6,
            one_to_one: false,
        }
    }
}

/// Constructs a node mapping from the IoU of the segmentations, frame by frame.
///
/// Without `one_to_one` a node can match several nodes in the other graph.
#[derive(Debug, Clone)]
pub struct IouMatcher<F: OverlapFinder = BoundingBoxOverlap> {
    config: IouMatcherConfig,
    finder: F,
}

impl IouMatcher<BoundingBoxOverlap> {
    pub fn new(config: IouMatcherConfig) -> Self {
        Self::with_finder(config, BoundingBoxOverlap)
    }

    pub fn with_threshold(iou_threshold: f64) -> Self {
        Self::new(IouMatcherConfig {
            iou_threshold,
            ..Default::default()
        })
    }
}

impl Default for IouMatcher<BoundingBoxOverlap> {
    fn default() -> Self {
        Self::new(IouMatcherConfig::default())
    }
}

impl<F: OverlapFinder> IouMatcher<F> {
    pub fn with_finder(config: IouMatcherConfig, finder: F) -> Self {
        Self { config, finder }
    }

    /// Match the graphs and bundle them with the resulting mapping.
    pub fn compute_mapping(&self, gt: TrackingGraph, pred: TrackingGraph) -> Result<Matched> {
        let mapping = self.mapping(&gt, &pred)?;
        Ok(Matched::new(gt, pred, mapping))
    }

    /// Node pairs `(gt, pred)` whose segmentations overlap with IoU above threshold.
    ///
    /// Pairs are ordered by frame, then by gt label, then by pred label.
    pub fn mapping(
        &self,
        gt: &TrackingGraph,
        pred: &TrackingGraph,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        check_threshold(self.config.iou_threshold)?;

        let (gt_seg, pred_seg) = match (gt.segmentation(), pred.segmentation()) {
            (Some(g), Some(p)) => (g, p),
            _ => return Err(Error::MissingSegmentation),
        };
        if gt_seg.shape() != pred_seg.shape() {
            return Err(Error::ShapeMismatch {
                gt: gt_seg.shape().to_vec(),
                pred: pred_seg.shape().to_vec(),
            });
        }

        let frames = gt.frame_range();
        let available = gt_seg.len_of(Axis(0));
        if frames.len() > available {
            return Err(Error::InvalidInput(format!(
                "graph spans {} frames but segmentation holds {}",
                frames.len(),
                available
            )));
        }

        let total = frames.len();
        let mut mapping = Vec::new();
        for (i, t) in frames.enumerate() {
            // Both volumes share the ground truth frame origin
            let views = (gt.frame_view(t), pred.segmentation_slice(i));
            let (Some(gt_frame), Some(pred_frame)) = views else {
                return Err(Error::InvalidInput(format!("no segmentation slice for frame {t}")));
            };
            let matches = self.match_frame(gt_frame, pred_frame)?;
            debug!(frame = t, matches = matches.len(), "Matching frames {}/{}", i + 1, total);

            for (gt_label, pred_label) in matches {
                let gt_node = gt.node_with_label(t, gt_label).ok_or(Error::UnknownLabel {
                    frame: t,
                    label: gt_label,
                })?;
                let pred_node = pred.node_with_label(t, pred_label).ok_or(Error::UnknownLabel {
                    frame: t,
                    label: pred_label,
                })?;
                mapping.push((gt_node, pred_node));
            }
        }

        info!(
            pairs = mapping.len(),
            frames = total,
            threshold = self.config.iou_threshold,
            "IoU matching complete"
        );
        Ok(mapping)
    }

    /// Label pairs of one frame with IoU above threshold, sorted by `(gt, pred)`.
    pub fn match_frame(
        &self,
        gt: ArrayViewD<'_, u32>,
        pred: ArrayViewD<'_, u32>,
    ) -> Result<Vec<(u32, u32)>> {
        let candidates = self.finder.find(gt.view(), pred.view());
        if candidates.is_empty() {
            return Ok(vec![]);
        }

        let threshold = self.config.iou_threshold;
        let passing: BTreeMap<(u32, u32), f64> = candidate_ious(&gt, &pred, &candidates)
            .into_iter()
            .filter(|&(_, iou)| iou >= threshold)
            .collect();

        if self.config.one_to_one {
            one_to_one(&passing, threshold)
        } else {
            Ok(passing.into_keys().collect())
        }
    }
}

/// Match two graphs at `threshold` with the default overlap finder.
pub fn compute_match(
    gt: &TrackingGraph,
    pred: &TrackingGraph,
    threshold: f64,
) -> Result<Vec<(NodeId, NodeId)>> {
    IouMatcher::with_threshold(threshold).mapping(gt, pred)
}

fn check_threshold(threshold: f64) -> Result<()> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidThreshold(threshold))
    }
}

/// Exact IoU of every candidate pair, keyed and ordered by `(gt_label, pred_label)`.
///
/// Background (label 0) is never part of a pair.
pub fn candidate_ious(
    gt: &ArrayViewD<'_, u32>,
    pred: &ArrayViewD<'_, u32>,
    candidates: &OverlapCandidates,
) -> BTreeMap<(u32, u32), f64> {
    let wanted: BTreeSet<(u32, u32)> = candidates
        .pairs()
        .filter(|&(g, p)| g != 0 && p != 0)
        .collect();

    let mut gt_area: HashMap<u32, usize> = HashMap::new();
    let mut pred_area: HashMap<u32, usize> = HashMap::new();
    let mut intersection: HashMap<(u32, u32), usize> = HashMap::new();

    for (&g, &p) in gt.iter().zip(pred.iter()) {
        if g != 0 {
            *gt_area.entry(g).or_default() += 1;
        }
        if p != 0 {
            *pred_area.entry(p).or_default() += 1;
        }
        if wanted.contains(&(g, p)) {
            *intersection.entry((g, p)).or_default() += 1;
        }
    }

    wanted
        .into_iter()
        .map(|(g, p)| {
            let inter = intersection.get(&(g, p)).copied().unwrap_or(0);
            let union = gt_area.get(&g).copied().unwrap_or(0)
                + pred_area.get(&p).copied().unwrap_or(0)
                - inter;
            let iou = if union > 0 {
                inter as f64 / union as f64
            } else {
                0.0
            };
            ((g, p), iou)
        })
        .collect()
}

fn one_to_one(ious: &BTreeMap<(u32, u32), f64>, threshold: f64) -> Result<Vec<(u32, u32)>> {
    if ious.is_empty() {
        return Ok(vec![]);
    }

    let rows: Vec<u32> = ious.keys().map(|p| p.0).collect::<BTreeSet<_>>().into_iter().collect();
    let cols: Vec<u32> = ious.keys().map(|p| p.1).collect::<BTreeSet<_>>().into_iter().collect();
    let row_of: HashMap<u32, usize> = rows.iter().enumerate().map(|(i, &g)| (g, i)).collect();
    let col_of: HashMap<u32, usize> = cols.iter().enumerate().map(|(j, &p)| (p, j)).collect();

    let mut matrix = Array2::<f64>::zeros((rows.len(), cols.len()));
    for (&(g, p), &iou) in ious {
        matrix[[row_of[&g], col_of[&p]]] = iou;
    }

    let result = max_iou_assignment(&matrix, threshold)?;
    let mut assigned: Vec<(u32, u32)> = result
        .matches
        .into_iter()
        .map(|(i, j)| (rows[i], cols[j]))
        .collect();
    assigned.sort_unstable();
    Ok(assigned)
}
