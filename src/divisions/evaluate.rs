use tracing::info;

use crate::divisions::classify::classify_divisions;
use crate::divisions::shifted::correct_shifted_divisions;
use crate::error::Result;
use crate::graph::NodeFlag;
use crate::matcher::Matched;

/// Classify division errors, then correct shifted divisions for every frame
/// buffer from 1 to `max_frame_buffer`.
///
/// FN and FP divisions keep their flags; those explained by a frame buffer also
/// get `min_buffer_correct`, the smallest buffer that makes them correct.
pub fn evaluate_division_events(mut matched: Matched, max_frame_buffer: u32) -> Result<Matched> {
    classify_divisions(&mut matched)?;

    let fn_divs = matched.gt_graph().nodes_with_flag(NodeFlag::FnDiv);
    let fp_divs = matched.pred_graph().nodes_with_flag(NodeFlag::FpDiv);
    for node in fn_divs {
        matched.gt_graph.set_min_buffer_correct(node, None)?;
    }
    for node in fp_divs {
        matched.pred_graph.set_min_buffer_correct(node, None)?;
    }

    // Increasing order keeps the recorded buffer minimal
    let mut corrected = 0;
    for n_frames in 1..=max_frame_buffer {
        corrected += correct_shifted_divisions(&mut matched, n_frames)?.len();
    }

    info!(max_frame_buffer, corrected, "Evaluated division events");
    Ok(matched)
}
