//! Lineage graph of segmented objects over time.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use ndarray::{ArrayD, ArrayViewD, Axis};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{Error, Result};
use crate::graph::node::{NodeAttrs, NodeFlag, NodeId};

/// Directed acyclic graph of tracked objects with an optional segmentation volume.
///
/// Each node is one object instance in one frame. Edges point forward in time
/// from parent to child and are stored once, so repeating an edge leaves the
/// topology unchanged. A node with two or more successors is a division.
#[derive(Debug, Clone, Default)]
pub struct TrackingGraph {
    graph: DiGraph<NodeId, ()>,
    indices: HashMap<NodeId, NodeIndex>,
    nodes: HashMap<NodeId, NodeAttrs>,
    frames: BTreeMap<u32, Vec<NodeId>>,
    labels: HashMap<(u32, u32), NodeId>,
    segmentation: Option<ArrayD<u32>>,
    division_annotations: bool,
}

impl TrackingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_node(&mut self, id: NodeId, frame: u32, label: u32) -> Result<()> {
        if self.nodes.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }
        if self.labels.contains_key(&(frame, label)) {
            return Err(Error::DuplicateLabel { frame, label });
        }
        let index = self.graph.add_node(id);
        self.indices.insert(id, index);
        self.nodes.insert(id, NodeAttrs::new(frame, label));
        self.frames.entry(frame).or_default().push(id);
        self.labels.insert((frame, label), id);
        Ok(())
    }

    /// Add a parent -> child edge. Adding an existing edge again is a no-op.
    pub(crate) fn insert_edge(&mut self, src: NodeId, dst: NodeId) -> Result<()> {
        let a = self.index(src)?;
        let b = self.index(dst)?;
        self.graph.update_edge(a, b, ());
        Ok(())
    }

    pub(crate) fn set_segmentation(&mut self, segmentation: ArrayD<u32>) {
        self.segmentation = Some(segmentation);
    }

    fn index(&self, node: NodeId) -> Result<NodeIndex> {
        self.indices.get(&node).copied().ok_or(Error::UnknownNode(node))
    }

    /// Neighbors in edge insertion order.
    fn neighbors(&self, node: NodeId, dir: Direction) -> Vec<NodeId> {
        let Some(&index) = self.indices.get(&node) else {
            return vec![];
        };
        // petgraph yields the most recently added edge first
        let mut out: Vec<NodeId> = self
            .graph
            .neighbors_directed(index, dir)
            .map(|n| self.graph[n])
            .collect();
        out.reverse();
        out
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(|i| self.graph[i])
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn attrs(&self, node: NodeId) -> Result<&NodeAttrs> {
        self.nodes.get(&node).ok_or(Error::UnknownNode(node))
    }

    pub fn frame(&self, node: NodeId) -> Result<u32> {
        Ok(self.attrs(node)?.frame)
    }

    pub fn successors(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbors(node, Direction::Outgoing)
    }

    pub fn predecessors(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbors(node, Direction::Incoming)
    }

    /// First frame holding a node.
    pub fn start_frame(&self) -> u32 {
        self.frames.keys().next().copied().unwrap_or(0)
    }

    /// One past the last frame holding a node.
    pub fn end_frame(&self) -> u32 {
        self.frames
            .keys()
            .next_back()
            .map(|t| t.saturating_add(1))
            .unwrap_or(0)
    }

    pub fn frame_range(&self) -> Range<u32> {
        self.start_frame()..self.end_frame()
    }

    pub fn nodes_in_frame(&self, frame: u32) -> &[NodeId] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The node carrying `label` in `frame`, if any.
    pub fn node_with_label(&self, frame: u32, label: u32) -> Option<NodeId> {
        self.labels.get(&(frame, label)).copied()
    }

    /// Nodes with two or more successors, in insertion order.
    pub fn divisions(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&i| self.graph.neighbors_directed(i, Direction::Outgoing).count() >= 2)
            .map(|i| self.graph[i])
            .collect()
    }

    pub fn nodes_with_flag(&self, flag: NodeFlag) -> Vec<NodeId> {
        self.nodes()
            .filter(|n| self.nodes[n].has_flag(flag))
            .collect()
    }

    pub fn set_flag(&mut self, node: NodeId, flag: NodeFlag) -> Result<()> {
        let attrs = self.nodes.get_mut(&node).ok_or(Error::UnknownNode(node))?;
        attrs.flags.insert(flag);
        Ok(())
    }

    pub fn min_buffer_correct(&self, node: NodeId) -> Result<Option<u32>> {
        Ok(self.attrs(node)?.min_buffer_correct)
    }

    pub fn set_min_buffer_correct(&mut self, node: NodeId, value: Option<u32>) -> Result<()> {
        let attrs = self.nodes.get_mut(&node).ok_or(Error::UnknownNode(node))?;
        attrs.min_buffer_correct = value;
        Ok(())
    }

    /// Segmentation volume, time along axis 0.
    pub fn segmentation(&self) -> Option<&ArrayD<u32>> {
        self.segmentation.as_ref()
    }

    /// Labeled frame at position `index` along the time axis of the segmentation.
    pub fn segmentation_slice(&self, index: usize) -> Option<ArrayViewD<'_, u32>> {
        let seg = self.segmentation.as_ref()?;
        if index >= seg.len_of(Axis(0)) {
            return None;
        }
        Some(seg.index_axis(Axis(0), index))
    }

    /// Labeled frame for frame `t`. Slice 0 of the segmentation is `start_frame`.
    pub fn frame_view(&self, t: u32) -> Option<ArrayViewD<'_, u32>> {
        let offset = t.checked_sub(self.start_frame())?;
        self.segmentation_slice(usize::try_from(offset).ok()?)
    }

    /// Whether division flags have already been written onto this graph.
    pub fn division_annotations(&self) -> bool {
        self.division_annotations
    }

    pub fn set_division_annotations(&mut self, done: bool) {
        self.division_annotations = done;
    }
}
