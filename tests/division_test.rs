use lineage_eval::divisions::{classify_divisions, correct_shifted_divisions};
use lineage_eval::{
    DivisionCounts, DivisionReport, Error, Matched, NodeFlag, NodeId, TrackingGraph,
    TrackingGraphBuilder, evaluate_division_events,
};

fn graph(nodes: &[(u64, u32)], edges: &[(u64, u64)]) -> TrackingGraph {
    // Label = node id, unique within each frame
    let mut builder = TrackingGraphBuilder::new();
    for &(id, frame) in nodes {
        builder = builder.node(id, frame, id as u32);
    }
    for &(src, dst) in edges {
        builder = builder.edge(src, dst);
    }
    builder.build().unwrap()
}

fn matched(gt: TrackingGraph, pred: TrackingGraph, mapping: &[(u64, u64)]) -> Matched {
    let mapping = mapping.iter().map(|&(g, p)| (NodeId(g), NodeId(p))).collect();
    Matched::new(gt, pred, mapping)
}

fn flags(graph: &TrackingGraph, node: u64) -> Vec<NodeFlag> {
    graph.attrs(NodeId(node)).unwrap().flags.iter().copied().collect()
}

fn min_buffer(graph: &TrackingGraph, node: u64) -> Option<u32> {
    graph.min_buffer_correct(NodeId(node)).unwrap()
}

/// Ground truth division at frame 5 (node 5) with daughters 61, 62 continuing to 71, 72.
fn gt_division() -> TrackingGraph {
    graph(
        &[(4, 4), (5, 5), (61, 6), (62, 6), (71, 7), (72, 7)],
        &[(4, 5), (5, 61), (5, 62), (61, 71), (62, 72)],
    )
}

/// Predicted division one frame late: 105 -> 106 divides into 107, 108 at frame 7.
fn pred_late_division() -> TrackingGraph {
    graph(
        &[(104, 4), (105, 5), (106, 6), (107, 7), (108, 7)],
        &[(104, 105), (105, 106), (106, 107), (106, 108)],
    )
}

#[test]
fn test_true_positive_division() {
    let pred = graph(
        &[(104, 4), (105, 5), (161, 6), (162, 6)],
        &[(104, 105), (105, 161), (105, 162)],
    );
    let mut data = matched(gt_division(), pred, &[(4, 104), (5, 105), (61, 161), (62, 162)]);
    classify_divisions(&mut data).unwrap();

    assert_eq!(flags(data.gt_graph(), 5), vec![NodeFlag::TpDiv]);
    assert_eq!(flags(data.pred_graph(), 105), vec![NodeFlag::TpDiv]);
}

#[test]
fn test_count_mismatch_is_wrong_children() {
    // One daughter matched, one unmatched on the predicted side
    let pred = graph(
        &[(105, 5), (161, 6), (162, 6)],
        &[(105, 161), (105, 162)],
    );
    let mut data = matched(gt_division(), pred, &[(5, 105), (61, 161)]);
    classify_divisions(&mut data).unwrap();

    assert_eq!(flags(data.gt_graph(), 5), vec![NodeFlag::WcDiv]);
    assert_eq!(flags(data.pred_graph(), 105), vec![NodeFlag::WcDiv]);
    assert!(data.pred_graph().nodes_with_flag(NodeFlag::FpDiv).is_empty());
}

#[test]
fn test_missed_and_spurious_divisions() {
    let pred = graph(
        &[(105, 5), (106, 6), (200, 2), (201, 3), (202, 3)],
        &[(105, 106), (200, 201), (200, 202)],
    );
    let mut data = matched(gt_division(), pred, &[(5, 105)]);
    classify_divisions(&mut data).unwrap();

    // Matched to a non-dividing node
    assert_eq!(flags(data.gt_graph(), 5), vec![NodeFlag::FnDiv]);
    assert_eq!(data.pred_graph().nodes_with_flag(NodeFlag::FpDiv), vec![NodeId(200)]);
    assert!(flags(data.pred_graph(), 105).is_empty());
}

#[test]
fn test_unmatched_gt_division_is_false_negative() {
    let data = evaluate_division_events(matched(gt_division(), graph(&[], &[]), &[]), 0).unwrap();
    assert_eq!(flags(data.gt_graph(), 5), vec![NodeFlag::FnDiv]);
    assert_eq!(min_buffer(data.gt_graph(), 5), None);
}

#[test]
fn test_late_division_corrected_at_buffer_one() {
    let data = matched(
        gt_division(),
        pred_late_division(),
        &[(4, 104), (5, 105), (71, 107), (72, 108)],
    );
    let data = evaluate_division_events(data, 1).unwrap();

    // Flags stay, the buffer is an extra annotation
    assert_eq!(flags(data.gt_graph(), 5), vec![NodeFlag::FnDiv]);
    assert_eq!(flags(data.pred_graph(), 106), vec![NodeFlag::FpDiv]);
    assert_eq!(min_buffer(data.gt_graph(), 5), Some(1));
    assert_eq!(min_buffer(data.pred_graph(), 106), Some(1));

    let report = DivisionReport::collect(&data);
    assert_eq!(
        report.counts_at_buffer(0),
        DivisionCounts {
            true_positives: 0,
            false_positives: 1,
            false_negatives: 1,
            wrong_children: 0,
        }
    );
    assert_eq!(report.counts_at_buffer(1).true_positives, 1);
    assert_eq!(report.counts_at_buffer(1).false_negatives, 0);
    assert_eq!(report.counts_at_buffer(1).false_positives, 0);
}

#[test]
fn test_early_division_corrected() {
    // Prediction divides at frame 4 while ground truth divides at frame 5
    let pred = graph(
        &[(104, 4), (151, 5), (152, 5), (161, 6), (162, 6)],
        &[(104, 151), (104, 152), (151, 161), (152, 162)],
    );
    let data = matched(gt_division(), pred, &[(4, 104), (61, 161), (62, 162)]);
    let data = evaluate_division_events(data, 2).unwrap();

    assert_eq!(min_buffer(data.gt_graph(), 5), Some(1));
    assert_eq!(min_buffer(data.pred_graph(), 104), Some(1));
}

#[test]
fn test_minimal_buffer_is_recorded() {
    // Prediction divides two frames late
    let gt = graph(
        &[(5, 5), (61, 6), (62, 6), (71, 7), (72, 7), (81, 8), (82, 8)],
        &[(5, 61), (5, 62), (61, 71), (62, 72), (71, 81), (72, 82)],
    );
    let pred = graph(
        &[(105, 5), (106, 6), (107, 7), (181, 8), (182, 8)],
        &[(105, 106), (106, 107), (107, 181), (107, 182)],
    );
    let data = matched(gt, pred, &[(5, 105), (81, 181), (82, 182)]);
    let data = evaluate_division_events(data, 3).unwrap();

    assert_eq!(min_buffer(data.gt_graph(), 5), Some(2));
    assert_eq!(min_buffer(data.pred_graph(), 107), Some(2));
}

#[test]
fn test_shift_beyond_buffer_not_corrected() {
    let gt = graph(
        &[(5, 5), (61, 6), (62, 6), (71, 7), (72, 7), (81, 8), (82, 8)],
        &[(5, 61), (5, 62), (61, 71), (62, 72), (71, 81), (72, 82)],
    );
    let pred = graph(
        &[(105, 5), (106, 6), (107, 7), (181, 8), (182, 8)],
        &[(105, 106), (106, 107), (107, 181), (107, 182)],
    );
    let mut data = matched(gt, pred, &[(5, 105), (81, 181), (82, 182)]);
    classify_divisions(&mut data).unwrap();

    assert!(correct_shifted_divisions(&mut data, 1).unwrap().is_empty());
    assert_eq!(min_buffer(data.gt_graph(), 5), None);
    assert_eq!(
        correct_shifted_divisions(&mut data, 2).unwrap(),
        vec![(NodeId(5), NodeId(107))]
    );
}

#[test]
fn test_resolved_nodes_are_not_overwritten() {
    let data = matched(
        gt_division(),
        pred_late_division(),
        &[(4, 104), (5, 105), (71, 107), (72, 108)],
    );
    let mut data = evaluate_division_events(data, 1).unwrap();

    assert!(correct_shifted_divisions(&mut data, 2).unwrap().is_empty());
    assert_eq!(min_buffer(data.gt_graph(), 5), Some(1));
}

#[test]
fn test_wrong_lineage_not_corrected() {
    // Late prediction whose parent is not matched to the gt division
    let data = matched(
        gt_division(),
        pred_late_division(),
        &[(4, 104), (71, 107), (72, 108)],
    );
    let data = evaluate_division_events(data, 1).unwrap();
    assert_eq!(min_buffer(data.gt_graph(), 5), None);
    assert_eq!(min_buffer(data.pred_graph(), 106), None);
}

#[test]
fn test_merge_in_walk_is_an_error() {
    let pred = graph(
        &[(105, 5), (109, 5), (106, 6), (107, 7), (108, 7)],
        &[(105, 106), (109, 106), (106, 107), (106, 108)],
    );
    let data = matched(gt_division(), pred, &[]);

    assert_eq!(
        evaluate_division_events(data, 1).unwrap_err(),
        Error::MergeDetected(NodeId(106))
    );
}

#[test]
fn test_evaluation_is_idempotent() {
    let data = matched(
        gt_division(),
        pred_late_division(),
        &[(4, 104), (5, 105), (71, 107), (72, 108)],
    );
    let once = evaluate_division_events(data, 1).unwrap();
    let first = DivisionReport::collect(&once);
    let twice = evaluate_division_events(once, 1).unwrap();

    assert_eq!(DivisionReport::collect(&twice), first);
    assert_eq!(first.gt.false_negatives, vec![NodeId(5)]);
    assert_eq!(first.pred.false_positives, vec![NodeId(106)]);
}

#[test]
fn test_same_frame_pair_never_corrected() {
    // Node 5 is matched to non-dividing 300 first, so it is FN and 105 is FP.
    // The second match lines both divisions up in the same frame.
    let pred = graph(
        &[(300, 5), (105, 5), (161, 6), (162, 6)],
        &[(105, 161), (105, 162)],
    );
    let data = matched(
        gt_division(),
        pred,
        &[(5, 300), (5, 105), (61, 161), (62, 162)],
    );
    let data = evaluate_division_events(data, 3).unwrap();

    assert_eq!(flags(data.gt_graph(), 5), vec![NodeFlag::FnDiv]);
    assert_eq!(flags(data.pred_graph(), 105), vec![NodeFlag::FpDiv]);
    assert_eq!(min_buffer(data.gt_graph(), 5), None);
    assert_eq!(min_buffer(data.pred_graph(), 105), None);
}

#[test]
fn test_division_with_several_matches_uses_first() {
    let pred = || {
        graph(
            &[(105, 5), (300, 5), (161, 6), (162, 6)],
            &[(105, 161), (105, 162)],
        )
    };

    let mut first_divides = matched(
        gt_division(),
        pred(),
        &[(5, 105), (5, 300), (61, 161), (62, 162)],
    );
    classify_divisions(&mut first_divides).unwrap();
    assert_eq!(flags(first_divides.gt_graph(), 5), vec![NodeFlag::TpDiv]);
    assert_eq!(flags(first_divides.pred_graph(), 105), vec![NodeFlag::TpDiv]);
    assert!(flags(first_divides.pred_graph(), 300).is_empty());

    let mut first_does_not = matched(
        gt_division(),
        pred(),
        &[(5, 300), (5, 105), (61, 161), (62, 162)],
    );
    classify_divisions(&mut first_does_not).unwrap();
    assert_eq!(flags(first_does_not.gt_graph(), 5), vec![NodeFlag::FnDiv]);
    assert_eq!(flags(first_does_not.pred_graph(), 105), vec![NodeFlag::FpDiv]);
}

#[test]
fn test_shifted_ancestor_with_several_matches() {
    // Predicted 105 also matches gt 55; the late division is still corrected
    let gt = graph(
        &[(4, 4), (5, 5), (55, 5), (61, 6), (62, 6), (71, 7), (72, 7)],
        &[(4, 5), (5, 61), (5, 62), (61, 71), (62, 72)],
    );
    let data = matched(
        gt,
        pred_late_division(),
        &[(4, 104), (5, 105), (55, 105), (71, 107), (72, 108)],
    );
    let data = evaluate_division_events(data, 1).unwrap();

    assert_eq!(min_buffer(data.gt_graph(), 5), Some(1));
    assert_eq!(min_buffer(data.pred_graph(), 106), Some(1));
}

#[test]
fn test_repeated_edge_is_not_a_division() {
    let chain = TrackingGraphBuilder::new()
        .node(1, 0, 1)
        .node(2, 1, 1)
        .edge(1, 2)
        .edge(1, 2)
        .build()
        .unwrap();
    let data = matched(chain.clone(), chain, &[(1, 1), (2, 2)]);
    let data = evaluate_division_events(data, 2).unwrap();

    assert!(data.gt_graph().divisions().is_empty());
    assert!(data.gt_graph().nodes_with_flag(NodeFlag::FnDiv).is_empty());
    assert!(data.pred_graph().nodes_with_flag(NodeFlag::FpDiv).is_empty());
}
