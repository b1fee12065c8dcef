use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node in a tracking graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Annotation flags written onto graph nodes by the division evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeFlag {
    /// Division present in both graphs with matching daughters
    TpDiv,
    /// Predicted division with no ground truth counterpart
    FpDiv,
    /// Ground truth division missed by the prediction
    FnDiv,
    /// Division detected but daughters do not correspond
    WcDiv,
}

/// Attributes attached to a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttrs {
    /// Frame index the object lives in
    pub frame: u32,
    /// Segmentation label of the object in its frame
    pub label: u32,
    /// Flags set by the evaluation
    pub flags: BTreeSet<NodeFlag>,
    /// Smallest frame buffer at which a FP/FN division becomes correct
    pub min_buffer_correct: Option<u32>,
}

impl NodeAttrs {
    pub fn new(frame: u32, label: u32) -> Self {
        Self {
            frame,
            label,
            ..Default::default()
        }
    }

    #[inline]
    pub fn has_flag(&self, flag: NodeFlag) -> bool {
        self.flags.contains(&flag)
    }
}
