//! Candidate generation for IoU matching.

use std::collections::BTreeMap;

use ndarray::{ArrayViewD, Dimension};

use crate::matcher::bbox::LabelBox;

/// Candidate label pairs between a ground truth and a predicted frame.
///
/// The three vectors are parallel: entry `i` proposes `gt_labels[i]` against
/// `pred_labels[i]`, with `overlaps[i]` as a size hint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapCandidates {
    pub gt_labels: Vec<u32>,
    pub pred_labels: Vec<u32>,
    pub overlaps: Vec<f64>,
}

impl OverlapCandidates {
    pub fn len(&self) -> usize {
        self.gt_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gt_labels.is_empty()
    }

    pub fn push(&mut self, gt_label: u32, pred_label: u32, overlap: f64) {
        self.gt_labels.push(gt_label);
        self.pred_labels.push(pred_label);
        self.overlaps.push(overlap);
    }

    /// Iterate over `(gt_label, pred_label)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.gt_labels.iter().copied().zip(self.pred_labels.iter().copied())
    }
}

/// Proposes label pairs whose regions may overlap.
///
/// Implement this trait to plug a faster or more specialised spatial index into
/// the IoU matcher. Pairs missing from the proposal are never matched.
///
/// # Example
///
/// ```ignore
/// use lineage_eval::{OverlapCandidates, OverlapFinder};
/// use ndarray::ArrayViewD;
///
/// struct SameLabel;
///
/// impl OverlapFinder for SameLabel {
///     fn find(&self, gt: ArrayViewD<'_, u32>, _pred: ArrayViewD<'_, u32>) -> OverlapCandidates {
///         let mut out = OverlapCandidates::default();
///         for label in 1..=gt.iter().copied().max().unwrap_or(0) {
///             out.push(label, label, 0.0);
///         }
///         out
///     }
/// }
/// ```
pub trait OverlapFinder {
    /// Return candidate pairs for two labeled frames of identical shape.
    fn find(&self, gt: ArrayViewD<'_, u32>, pred: ArrayViewD<'_, u32>) -> OverlapCandidates;
}

/// Proposes every pair of labels whose bounding boxes intersect.
///
/// The overlap hint is the IoU of the two boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxOverlap;

impl OverlapFinder for BoundingBoxOverlap {
    fn find(&self, gt: ArrayViewD<'_, u32>, pred: ArrayViewD<'_, u32>) -> OverlapCandidates {
        let gt_boxes = label_boxes(&gt);
        let pred_boxes = label_boxes(&pred);

        let mut candidates = OverlapCandidates::default();
        for (&g, g_box) in &gt_boxes {
            for (&p, p_box) in &pred_boxes {
                if g_box.intersection(p_box).is_some() {
                    candidates.push(g, p, g_box.iou(p_box));
                }
            }
        }
        candidates
    }
}

/// Bounding boxes of every non-background label in a frame, keyed by label.
pub fn label_boxes(frame: &ArrayViewD<'_, u32>) -> BTreeMap<u32, LabelBox> {
    let mut boxes: BTreeMap<u32, LabelBox> = BTreeMap::new();
    for (index, &label) in frame.indexed_iter() {
        if label == 0 {
            continue;
        }
        let index = index.slice();
        boxes
            .entry(label)
            .and_modify(|b| b.extend(index))
            .or_insert_with(|| LabelBox::from_point(index));
    }
    boxes
}
