mod assignment;
mod bbox;
mod iou;
mod matched;
mod overlap;

pub use assignment::{AssignmentResult, max_iou_assignment};
pub use bbox::LabelBox;
pub use iou::{IouMatcher, IouMatcherConfig, candidate_ious, compute_match};
pub use matched::{MatchIndex, Matched};
pub use overlap::{BoundingBoxOverlap, OverlapCandidates, OverlapFinder, label_boxes};
