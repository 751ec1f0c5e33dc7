//! Hit testing: pixel position → node lookup.
//!
//! Nodes are drawn in declaration order, so the last node whose circle
//! contains the point is the one on top.

use arna_core::{Graph, NodeId, Point};
use kurbo::Rect;

/// Find the topmost node whose circle of `radius` contains `point`.
/// Returns `None` if no node is hit (background).
pub fn hit_test(graph: &Graph, point: Point, radius: f64) -> Option<NodeId> {
    graph
        .graph
        .raw_nodes()
        .iter()
        .rev()
        .map(|raw| &raw.weight)
        .find(|node| node.position.distance(point) <= radius)
        .map(|node| node.id)
}

/// All nodes whose circle intersects `rect`, in declaration order.
/// Used for marquee selection.
pub fn hit_test_rect(graph: &Graph, rect: Rect, radius: f64) -> Vec<NodeId> {
    let rect = rect.abs();
    graph
        .nodes()
        .filter(|node| {
            let nearest = Point::new(
                node.position.x.max(rect.x0).min(rect.x1),
                node.position.y.max(rect.y0).min(rect.y1),
            );
            nearest.distance(node.position) <= radius
        })
        .map(|node| node.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arna_core::{CompileOptions, GraphParameterOverrides, compile};

    fn graph() -> Graph {
        let options = CompileOptions::seeded(1).with_parameters(GraphParameterOverrides {
            max_ticks: Some(0),
            ..GraphParameterOverrides::default()
        });
        let mut graph = compile("graph hits { H1 H2 H3 }", &options).unwrap();
        let spots = [(10.0, 10.0), (15.0, 10.0), (100.0, 100.0)];
        for (node, (x, y)) in graph.graph.node_weights_mut().zip(spots) {
            node.position = Point::new(x, y);
        }
        graph
    }

    #[test]
    fn topmost_node_wins() {
        let g = graph();
        assert_eq!(
            hit_test(&g, Point::new(12.0, 10.0), 12.0),
            Some(NodeId::intern("H2"))
        );
    }

    #[test]
    fn background_misses() {
        let g = graph();
        assert_eq!(hit_test(&g, Point::new(60.0, 60.0), 12.0), None);
    }

    #[test]
    fn marquee_selects_touching_circles() {
        let g = graph();
        let hits = hit_test_rect(&g, Rect::new(95.0, 95.0, 0.0, 0.0), 12.0);
        assert_eq!(
            hits,
            vec![
                NodeId::intern("H1"),
                NodeId::intern("H2"),
                NodeId::intern("H3"),
            ]
        );
        let hits = hit_test_rect(&g, Rect::new(30.0, 30.0, 50.0, 50.0), 12.0);
        assert!(hits.is_empty());
    }
}
