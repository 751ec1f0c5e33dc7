//! Serializable snapshot of a laid-out graph.

use crate::config::GraphParameters;
use crate::model::{EdgeOptions, Graph, LayoutBounds, NodeOptions};
use arna_bundler::Point;
use petgraph::visit::EdgeRef;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub name: String,
    pub parameters: GraphParameters,
    /// `None` for an empty graph.
    pub bounds: Option<LayoutBounds>,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub position: Point,
    #[serde(flatten)]
    pub options: NodeOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSnapshot {
    pub tail: String,
    pub head: String,
    pub directed: bool,
    #[serde(flatten)]
    pub options: EdgeOptions,
    /// Tail-to-head path; straight unless the graph was bundled.
    pub polyline: Vec<Point>,
}

impl GraphSnapshot {
    pub fn of(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeSnapshot {
                id: node.id.to_string(),
                position: node.position,
                options: node.options.clone(),
            })
            .collect();

        let edges = graph
            .graph
            .edge_references()
            .map(|edge| EdgeSnapshot {
                tail: graph.graph[edge.source()].id.to_string(),
                head: graph.graph[edge.target()].id.to_string(),
                directed: edge.weight().directed,
                options: edge.weight().options.clone(),
                polyline: graph.edge_polyline(edge.id()),
            })
            .collect();

        Self {
            name: graph.name.clone(),
            parameters: graph.parameters,
            bounds: (!graph.bounds.is_empty()).then_some(graph.bounds),
            nodes,
            edges,
        }
    }
}

impl From<&Graph> for GraphSnapshot {
    fn from(graph: &Graph) -> Self {
        GraphSnapshot::of(graph)
    }
}
