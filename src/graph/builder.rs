//! Builder for assembling a `TrackingGraph` from nodes, edges and segmentation.

use ndarray::ArrayD;

use crate::error::Result;
use crate::graph::node::NodeId;
use crate::graph::tracking_graph::TrackingGraph;

/// Fluent builder for `TrackingGraph`.
///
/// Validation is deferred to [`TrackingGraphBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct TrackingGraphBuilder {
    nodes: Vec<(NodeId, u32, u32)>,
    edges: Vec<(NodeId, NodeId)>,
    segmentation: Option<ArrayD<u32>>,
}

impl TrackingGraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at `frame` carrying segmentation `label`.
    pub fn node(mut self, id: u64, frame: u32, label: u32) -> Self {
        self.nodes.push((NodeId(id), frame, label));
        self
    }

    /// Add a parent -> child edge.
    pub fn edge(mut self, src: u64, dst: u64) -> Self {
        self.edges.push((NodeId(src), NodeId(dst)));
        self
    }

    /// Attach a segmentation volume with time along axis 0.
    pub fn segmentation(mut self, segmentation: ArrayD<u32>) -> Self {
        self.segmentation = Some(segmentation);
        self
    }

    /// Build the graph.
    ///
    /// Fails on duplicate node ids, duplicate labels within a frame and
    /// edges that reference unknown nodes. Repeated edges are kept once.
    pub fn build(self) -> Result<TrackingGraph> {
        let mut graph = TrackingGraph::new();
        for (id, frame, label) in self.nodes {
            graph.insert_node(id, frame, label)?;
        }
        for (src, dst) in self.edges {
            graph.insert_edge(src, dst)?;
        }
        if let Some(seg) = self.segmentation {
            graph.set_segmentation(seg);
        }
        Ok(graph)
    }
}
