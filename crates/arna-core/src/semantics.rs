//! Semantic analysis: [`Document`] → laid-out [`Graph`].
//!
//! Nodes are placed at random inside the configured placement range, edges
//! are resolved against the declared nodes (an unknown endpoint is fatal),
//! duplicate edges collapse onto the first declaration, and the layout is run
//! to completion.

use crate::ast::{Attributes, Document, EdgeDeclaration};
use crate::config::{CompileOptions, GraphParameterOverrides, GraphParameters};
use crate::error::SemanticError;
use crate::id::NodeId;
use crate::layout::LayoutEngine;
use crate::model::{Edge, EdgeOptions, Graph, Node, NodeOptions};
use arna_bundler::Point;
use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Build the graph for `document` and run the layout.
pub fn analyze(document: &Document, options: &CompileOptions) -> Result<Graph, SemanticError> {
    let parameters = resolve_parameters(document, &options.parameters);
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut graph = build_graph(document, parameters, rng)?;
    graph.compute_layout();
    Ok(graph)
}

/// Defaults, then the document's graph-level `bundle` flag, then the
/// caller's overrides.
pub fn resolve_parameters(
    document: &Document,
    overrides: &GraphParameterOverrides,
) -> GraphParameters {
    let base = GraphParameters {
        bundle: document.bundle(),
        ..GraphParameters::default()
    };
    overrides.apply_to(base)
}

/// Build the graph with randomly placed nodes, without running the layout.
pub fn build_graph(
    document: &Document,
    parameters: GraphParameters,
    mut rng: StdRng,
) -> Result<Graph, SemanticError> {
    let (low, high) = parameters.placement_range();
    let positions: Vec<Point> = document
        .node_declarations
        .iter()
        .map(|_| Point::new(sample(&mut rng, low, high), sample(&mut rng, low, high)))
        .collect();

    let mut graph = Graph::new(document.graph_name.clone(), parameters, rng);

    for (declaration, position) in document.node_declarations.iter().zip(positions) {
        let id = NodeId::intern(&declaration.identifier);
        if graph.index_of(id).is_some() {
            log::trace!("semantics: node `{id}` redeclared, keeping the first");
            continue;
        }
        let options = node_options(declaration.attributes.as_ref());
        graph.add_node(Node::new(id, position, options));
    }

    let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    for declaration in &document.edge_declarations {
        let (tail, head) = resolve_endpoints(&graph, declaration)?;
        if !seen.insert((tail.min(head), tail.max(head))) {
            log::trace!(
                "semantics: dropping duplicate edge `{}` / `{}`",
                declaration.tail,
                declaration.head
            );
            continue;
        }
        let options = edge_options(declaration.attributes.as_ref());
        graph.add_edge(tail, head, Edge::new(declaration.directed, options));
    }

    graph.recompute_bounds();
    log::debug!(
        "semantics: graph `{}` with {} nodes, {} edges",
        graph.name,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn resolve_endpoints(
    graph: &Graph,
    declaration: &EdgeDeclaration,
) -> Result<(NodeIndex, NodeIndex), SemanticError> {
    let lookup = |identifier: &str, location| {
        NodeId::get(identifier)
            .and_then(|id| graph.index_of(id))
            .ok_or_else(|| SemanticError::UnknownNodeReference {
                identifier: identifier.to_string(),
                location,
            })
    };
    let tail = lookup(&declaration.tail, declaration.tail_location)?;
    let head = lookup(&declaration.head, declaration.head_location)?;
    Ok((tail, head))
}

/// Uniform sample from `[low, high)`; collapses to `low` for an empty or
/// non-finite range.
fn sample(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    let (low, high) = (low.min(high), low.max(high));
    if low < high && low.is_finite() && high.is_finite() {
        rng.gen_range(low..high)
    } else if low.is_finite() {
        low
    } else {
        0.0
    }
}

fn node_options(attributes: Option<&Attributes>) -> NodeOptions {
    let Some(attributes) = attributes else {
        return NodeOptions::default();
    };
    NodeOptions {
        color: attributes.color.clone(),
        label: attributes.label.clone(),
        font: attributes.font.clone(),
        font_size: attributes.font_size.clone(),
    }
}

fn edge_options(attributes: Option<&Attributes>) -> EdgeOptions {
    let Some(attributes) = attributes else {
        return EdgeOptions::default();
    };
    EdgeOptions {
        color: attributes.color.clone(),
        line_width: attributes.line_width.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Location;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn build(source: &str) -> Result<Graph, SemanticError> {
        let document = parse(source).unwrap();
        let parameters = resolve_parameters(&document, &GraphParameterOverrides::default());
        build_graph(&document, parameters, StdRng::seed_from_u64(3))
    }

    #[test]
    fn nodes_start_inside_placement_range() {
        let graph = build("graph g { A B C D E }").unwrap();
        let (low, high) = GraphParameters::default().placement_range();
        for node in graph.nodes() {
            assert!((low..high).contains(&node.position.x));
            assert!((low..high).contains(&node.position.y));
        }
    }

    #[test]
    fn unknown_tail_is_reported() {
        let error = build("graph g { A Z -- A }").unwrap_err();
        assert_eq!(
            error,
            SemanticError::UnknownNodeReference {
                identifier: "Z".into(),
                location: Location::new(1, 13),
            }
        );
    }

    #[test]
    fn duplicate_edges_collapse_in_either_direction() {
        let graph = build("graph g { A B A -- B B -- A A -> B }").unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let (_, _, edge) = graph.edges().next().unwrap();
        assert!(!edge.directed);
    }

    #[test]
    fn first_duplicate_keeps_its_attributes() {
        let graph = build(r#"graph g { A B A -- B [color="red"] A -- B [color="blue"] }"#).unwrap();
        let (_, _, edge) = graph.edges().next().unwrap();
        assert_eq!(edge.options.color.as_deref(), Some("red"));
    }

    #[test]
    fn redeclared_node_keeps_first_attributes() {
        let graph = build(r#"graph g { A [label="one"] A [label="two"] }"#).unwrap();
        assert_eq!(graph.node_count(), 1);
        let node = graph.get_by_id(NodeId::intern("A")).unwrap();
        assert_eq!(node.options.label.as_deref(), Some("one"));
    }

    #[test]
    fn bundle_flag_resolution() {
        let document = parse("graph g [bundle] { }").unwrap();
        assert!(resolve_parameters(&document, &GraphParameterOverrides::default()).bundle);

        let off = GraphParameterOverrides {
            bundle: Some(false),
            ..GraphParameterOverrides::default()
        };
        assert!(!resolve_parameters(&document, &off).bundle);
    }

    #[test]
    fn sample_handles_degenerate_ranges() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(sample(&mut rng, 2.0, 2.0), 2.0);
        assert_eq!(sample(&mut rng, f64::NAN, 1.0), 1.0);
        let reversed = sample(&mut rng, 3.0, -3.0);
        assert!((-3.0..3.0).contains(&reversed));
    }

    #[test]
    fn same_seed_same_layout() {
        let document = parse("graph g { A B C A -- B B -- C }").unwrap();
        let options = CompileOptions::seeded(11);
        let first = analyze(&document, &options).unwrap();
        let second = analyze(&document, &options).unwrap();
        let a: Vec<Point> = first.nodes().map(|n| n.position).collect();
        let b: Vec<Point> = second.nodes().map(|n| n.position).collect();
        assert_eq!(a, b);
    }
}
