mod builder;
mod node;
mod tracking_graph;

pub use builder::TrackingGraphBuilder;
pub use node::{NodeAttrs, NodeFlag, NodeId};
pub use tracking_graph::TrackingGraph;
