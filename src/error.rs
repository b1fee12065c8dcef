//! Error types for lineage evaluation.

use thiserror::Error;

use crate::graph::NodeId;

/// Result type for lineage-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while matching or evaluating tracking graphs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input data is not usable for the requested operation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IoU matching requested on a graph without segmentation data.
    #[error("Segmentation data must be provided for both gt and pred data")]
    MissingSegmentation,

    /// Ground truth and predicted segmentations differ in shape.
    #[error("Segmentation shapes must match between gt and pred: {gt:?} vs {pred:?}")]
    ShapeMismatch { gt: Vec<usize>, pred: Vec<usize> },

    /// IoU threshold outside of (0, 1].
    #[error("Invalid IoU threshold {0}, expected a value in (0, 1]")]
    InvalidThreshold(f64),

    /// Node id not present in the graph.
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// A segmentation label with no corresponding node in its frame.
    #[error("No node with label {label} in frame {frame}")]
    UnknownLabel { frame: u32, label: u32 },

    /// Node id inserted twice.
    #[error("Duplicate node {0}")]
    DuplicateNode(NodeId),

    /// Two nodes in one frame share a segmentation label.
    #[error("Label {label} used by more than one node in frame {frame}")]
    DuplicateLabel { frame: u32, label: u32 },

    /// A lineage walk reached a node with more than one predecessor.
    #[error("Cannot operate on graphs with merges (node {0} has multiple predecessors)")]
    MergeDetected(NodeId),

    /// Linear assignment solver failure.
    #[error("Assignment error: {0}")]
    Assignment(String),
}
