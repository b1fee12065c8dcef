//! Property-based tests using proptest
//!
//! These tests check invariants of the IoU matcher on random label frames.

use std::collections::BTreeSet;

use lineage_eval::matcher::{BoundingBoxOverlap, OverlapFinder, candidate_ious};
use lineage_eval::{IouMatcher, IouMatcherConfig};
use ndarray::{Array2, ArrayD};
use proptest::prelude::*;

fn frame_strategy() -> impl Strategy<Value = ArrayD<u32>> {
    prop::collection::vec(0u32..5, 36)
        .prop_map(|v| Array2::from_shape_vec((6, 6), v).unwrap().into_dyn())
}

proptest! {
    #[test]
    fn prop_identity_matching(frame in frame_strategy()) {
        let matcher = IouMatcher::with_threshold(1.0);
        let matches = matcher.match_frame(frame.view(), frame.view()).unwrap();

        let labels: BTreeSet<u32> = frame.iter().copied().filter(|&l| l != 0).collect();
        let expected: Vec<(u32, u32)> = labels.into_iter().map(|l| (l, l)).collect();
        prop_assert_eq!(matches, expected);
    }

    #[test]
    fn prop_matching_is_symmetric(
        gt in frame_strategy(),
        pred in frame_strategy(),
        threshold in 0.05f64..=1.0
    ) {
        let matcher = IouMatcher::with_threshold(threshold);
        let forward = matcher.match_frame(gt.view(), pred.view()).unwrap();
        let mut backward: Vec<(u32, u32)> = matcher
            .match_frame(pred.view(), gt.view())
            .unwrap()
            .into_iter()
            .map(|(p, g)| (g, p))
            .collect();
        backward.sort_unstable();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_iou_in_unit_range(gt in frame_strategy(), pred in frame_strategy()) {
        let candidates = BoundingBoxOverlap.find(gt.view(), pred.view());
        for (_, iou) in candidate_ious(&gt.view(), &pred.view(), &candidates) {
            prop_assert!((0.0..=1.0).contains(&iou), "IoU out of range: {}", iou);
        }
    }

    #[test]
    fn prop_one_to_one_is_injective(
        gt in frame_strategy(),
        pred in frame_strategy(),
        threshold in 0.05f64..=1.0
    ) {
        let matcher = IouMatcher::new(IouMatcherConfig {
            iou_threshold: threshold,
            one_to_one: true,
        });
        let matches = matcher.match_frame(gt.view(), pred.view()).unwrap();

        let gts: BTreeSet<u32> = matches.iter().map(|m| m.0).collect();
        let preds: BTreeSet<u32> = matches.iter().map(|m| m.1).collect();
        prop_assert_eq!(gts.len(), matches.len());
        prop_assert_eq!(preds.len(), matches.len());
    }
}
