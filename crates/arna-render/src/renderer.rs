//! Graph → drawing calls on a [`DrawingSurface`].

use crate::prerender::{PreRenderer, RenderParameters};
use crate::surface::DrawingSurface;
use arna_core::{EdgeIndex, Graph, Point, TunableParameters};

pub struct Renderer<S: DrawingSurface> {
    surface: S,
    bundling: TunableParameters,
    radius: Option<f64>,
}

impl<S: DrawingSurface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            bundling: TunableParameters::default(),
            radius: None,
        }
    }

    /// Parameters used when the graph asks for bundled edges.
    pub fn with_bundling(mut self, bundling: TunableParameters) -> Self {
        self.bundling = bundling;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Fit the graph to the surface (and bundle it if requested).
    pub fn prerender(&self, graph: &mut Graph) -> RenderParameters {
        let mut pre = PreRenderer::new(self.surface.width(), self.surface.height());
        if let Some(radius) = self.radius {
            pre = pre.with_radius(radius);
        }
        pre.run(graph, &self.bundling)
    }

    /// Pre-render `graph`, then draw every edge followed by every node.
    ///
    /// Bundled graphs draw each edge as its polyline. Otherwise each edge is
    /// a straight line trimmed to the two node circles.
    pub fn draw(&mut self, graph: &mut Graph) -> RenderParameters {
        let parameters = self.prerender(graph);

        if graph.parameters.bundle {
            self.draw_bundled_edges(graph);
        } else {
            self.draw_straight_edges(graph, parameters.radius);
        }
        for node in graph.nodes() {
            self.surface
                .draw_circle(node.position, parameters.radius, &node.options);
        }

        self.surface.finalize();
        parameters
    }

    fn draw_bundled_edges(&mut self, graph: &Graph) {
        for edge in graph.graph.edge_indices() {
            let points: Vec<Point> = graph
                .edge_polyline(edge)
                .into_iter()
                .map(|p| Point::new(p.x.round(), p.y.round()))
                .collect();
            self.surface
                .draw_polyline(&points, &graph.graph[edge].options);
        }
    }

    fn draw_straight_edges(&mut self, graph: &Graph, radius: f64) {
        for edge in graph.graph.edge_indices() {
            let Some((tail, head)) = endpoints(graph, edge) else {
                continue;
            };
            let from = circle_exit(tail, head, radius);
            let to = circle_exit(head, tail, radius);
            self.surface.draw_line(from, to, &graph.graph[edge].options);
        }
    }
}

fn endpoints(graph: &Graph, edge: EdgeIndex) -> Option<(Point, Point)> {
    let (tail, head) = graph.graph.edge_endpoints(edge)?;
    Some((graph.graph[tail].position, graph.graph[head].position))
}

/// Where the segment from `center` towards `toward` leaves the circle of
/// `radius` around `center`, snapped to whole pixels. Coincident points
/// return `center`.
pub fn circle_exit(center: Point, toward: Point, radius: f64) -> Point {
    let delta = toward - center;
    let length = delta.hypot();
    if length == 0.0 {
        return center;
    }
    let exit = center + delta * (radius / length);
    Point::new(exit.x.round(), exit.y.round())
}
