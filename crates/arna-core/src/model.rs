//! Graph model: laid-out nodes, edges, and the views consumed by renderers.
//!
//! The graph is a petgraph `UnGraph` plus an id index, mirroring how the
//! source language names nodes. Edge direction is an attribute of the edge
//! (`->` vs `--`), not of the graph: the layout treats every edge alike.

use crate::config::GraphParameters;
use crate::id::NodeId;
use arna_bundler::{EdgeBundler, EdgeSubdivisionPoints, Line, Point, TunableParameters, Vec2};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Nodes & edges ───────────────────────────────────────────────────────

/// Presentation attributes of a node, copied from its declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

/// Presentation attributes of an edge, copied from its declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub position: Point,
    /// Force accumulated during the current tick; zero between ticks.
    pub force: Vec2,
    pub options: NodeOptions,
}

impl Node {
    pub fn new(id: NodeId, position: Point, options: NodeOptions) -> Self {
        Self {
            id,
            position,
            force: Vec2::ZERO,
            options,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    /// Declared with `->`.
    pub directed: bool,
    /// Attraction weight; see [`crate::layout::attraction_scale`].
    pub attraction: f64,
    pub options: EdgeOptions,
}

impl Edge {
    pub fn new(directed: bool, options: EdgeOptions) -> Self {
        Self {
            directed,
            attraction: 1.0,
            options,
        }
    }
}

// ─── Bounds ──────────────────────────────────────────────────────────────

/// Axis-aligned box around every node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl LayoutBounds {
    /// Inverted infinite box; `include` of any point makes it non-empty.
    pub const EMPTY: LayoutBounds = LayoutBounds {
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        y_min: f64::INFINITY,
        y_max: f64::NEG_INFINITY,
    };

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut bounds = Self::EMPTY;
        for point in points {
            bounds.include(point);
        }
        bounds
    }

    pub fn include(&mut self, point: Point) {
        self.x_min = self.x_min.min(point.x);
        self.x_max = self.x_max.max(point.x);
        self.y_min = self.y_min.min(point.y);
        self.y_max = self.y_max.max(point.y);
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.x_max - self.x_min }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.y_max - self.y_min }
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Views ───────────────────────────────────────────────────────────────

/// One incident edge seen from one of its endpoints.
///
/// `tail` is always the node the mapping is listed under; `polyline` runs
/// from `tail` to `head`.
#[derive(Debug, Clone)]
pub struct NodeMapping<'g> {
    pub tail: &'g Node,
    pub head: &'g Node,
    pub polyline: Vec<Point>,
    pub options: &'g EdgeOptions,
    pub directed: bool,
    /// The edge was declared `head -> tail` (or `head -- tail`).
    pub reversed: bool,
}

// ─── Graph ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Graph {
    pub name: String,

    /// Nodes and edges. Node and edge indices follow declaration order.
    pub graph: UnGraph<Node, Edge>,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,

    pub parameters: GraphParameters,

    /// Box around the committed node positions.
    pub bounds: LayoutBounds,

    /// Bundled polylines, one per edge in edge-index order, once
    /// [`Graph::bundle_edges`] has run. Excluded edges hold an empty polyline.
    pub edge_subdivisions: Option<Vec<EdgeSubdivisionPoints>>,

    /// Source of initial placement and coincident-node jitter.
    pub(crate) rng: StdRng,
}

impl Graph {
    pub fn new(name: impl Into<String>, parameters: GraphParameters, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            graph: UnGraph::default(),
            id_index: HashMap::new(),
            parameters,
            bounds: LayoutBounds::EMPTY,
            edge_subdivisions: None,
            rng,
        }
    }

    /// Insert a node. An id that already exists keeps its first node.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&existing) = self.id_index.get(&node.id) {
            return existing;
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        self.bounds.include(self.graph[idx].position);
        idx
    }

    pub fn add_edge(&mut self, tail: NodeIndex, head: NodeIndex, edge: Edge) -> EdgeIndex {
        self.edge_subdivisions = None;
        self.graph.add_edge(tail, head, edge)
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index_of(id).map(|idx| &mut self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// `(tail, head, edge)` triples in edge-index order.
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node, &Edge)> {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    /// Straight segment between the current endpoint positions of every edge.
    pub fn edge_segments(&self) -> Vec<Line> {
        self.edges()
            .map(|(tail, head, _)| Line::new(tail.position, head.position))
            .collect()
    }

    /// Recompute [`Graph::bounds`] from the current node positions.
    pub fn recompute_bounds(&mut self) {
        self.bounds = LayoutBounds::from_points(self.nodes().map(|n| n.position));
    }

    /// Bundle every edge at the current node positions and store the result
    /// in [`Graph::edge_subdivisions`].
    pub fn bundle_edges(&mut self, parameters: &TunableParameters) {
        let bundler = EdgeBundler::new(self.edge_segments(), *parameters);
        log::debug!(
            "graph `{}`: bundling {} of {} edges",
            self.name,
            bundler.bundled_edge_count(),
            self.edge_count()
        );
        self.edge_subdivisions = Some(bundler.bundle());
    }

    /// Polyline drawn for `edge`, tail to head: the bundled path when one is
    /// stored and non-empty, otherwise the straight segment.
    pub fn edge_polyline(&self, edge: EdgeIndex) -> Vec<Point> {
        if let Some(points) = self
            .edge_subdivisions
            .as_ref()
            .and_then(|all| all.get(edge.index()))
            .filter(|points| !points.is_empty())
        {
            return points.clone();
        }
        match self.graph.edge_endpoints(edge) {
            Some((tail, head)) => vec![self.graph[tail].position, self.graph[head].position],
            None => Vec::new(),
        }
    }

    /// Adjacency view keyed by node id. Every node has an entry; each edge is
    /// listed under both endpoints (once for a self-loop).
    pub fn node_mappings(&self) -> HashMap<NodeId, Vec<NodeMapping<'_>>> {
        let mut mappings: HashMap<NodeId, Vec<NodeMapping<'_>>> =
            self.nodes().map(|n| (n.id, Vec::new())).collect();

        for edge in self.graph.edge_references() {
            let tail = &self.graph[edge.source()];
            let head = &self.graph[edge.target()];
            let weight = edge.weight();
            let polyline = self.edge_polyline(edge.id());

            if edge.source() != edge.target() {
                let mut reversed_polyline = polyline.clone();
                reversed_polyline.reverse();
                mappings.entry(head.id).or_default().push(NodeMapping {
                    tail: head,
                    head: tail,
                    polyline: reversed_polyline,
                    options: &weight.options,
                    directed: weight.directed,
                    reversed: true,
                });
            }
            mappings.entry(tail.id).or_default().push(NodeMapping {
                tail,
                head,
                polyline,
                options: &weight.options,
                directed: weight.directed,
                reversed: false,
            });
        }
        mappings
    }
}
