//! Layout space → surface pixels.
//!
//! The layout produces coordinates in arbitrary units around the origin.
//! Before drawing, node positions are rescaled so the whole layout fits in
//! `[radius, size - radius]` on both axes, snapped to whole pixels, and
//! recentred on the surface. Bundling runs afterwards, in pixel space.

use arna_core::{Graph, LayoutBounds, Point, TunableParameters};

/// Node circle radius in pixels.
pub const DEFAULT_RADIUS: f64 = 12.0;

/// Values the renderer needs from the pre-render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreRenderer {
    width: f64,
    height: f64,
    radius: f64,
}

impl PreRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            radius: DEFAULT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Map a layout position into surface pixels for the given layout bounds.
    ///
    /// An axis with zero (or non-finite) extent maps to the surface centre.
    pub fn translate(&self, bounds: &LayoutBounds, position: Point) -> Point {
        Point::new(
            self.translate_axis(position.x, bounds.x_min, bounds.x_max, self.width),
            self.translate_axis(position.y, bounds.y_min, bounds.y_max, self.height),
        )
    }

    fn translate_axis(&self, value: f64, min: f64, max: f64, size: f64) -> f64 {
        let extent = max - min;
        if extent > 0.0 && extent.is_finite() {
            let scale = (size - 2.0 * self.radius) / extent;
            ((value - min) * scale + self.radius).round()
        } else {
            (size / 2.0).round()
        }
    }

    /// Move every node into pixel space, centre the result, and bundle the
    /// edges when the graph asks for it.
    pub fn run(&self, graph: &mut Graph, bundling: &TunableParameters) -> RenderParameters {
        if graph.node_count() > 0 {
            self.translate_node_positions(graph);
            self.center(graph);
        }
        if graph.parameters.bundle {
            graph.bundle_edges(bundling);
        }
        log::debug!(
            "prerender `{}` onto {}x{}: bounds {:?}",
            graph.name,
            self.width,
            self.height,
            graph.bounds
        );
        RenderParameters {
            radius: self.radius,
        }
    }

    fn translate_node_positions(&self, graph: &mut Graph) {
        let bounds = LayoutBounds::from_points(graph.nodes().map(|n| n.position));
        for node in graph.graph.node_weights_mut() {
            node.position = self.translate(&bounds, node.position);
        }
        graph.recompute_bounds();
    }

    fn center(&self, graph: &mut Graph) {
        let bounds = graph.bounds;
        let offset = kurbo::Vec2::new(
            (self.width / 2.0).round() - ((bounds.x_min + bounds.x_max) / 2.0).round(),
            (self.height / 2.0).round() - ((bounds.y_min + bounds.y_max) / 2.0).round(),
        );
        for node in graph.graph.node_weights_mut() {
            node.position += offset;
        }
        graph.recompute_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> LayoutBounds {
        LayoutBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[test]
    fn translate_maps_extremes_to_radius_inset() {
        let pre = PreRenderer::new(200.0, 100.0);
        let b = bounds(-1.0, 1.0, 0.0, 4.0);
        assert_eq!(pre.translate(&b, Point::new(-1.0, 0.0)), Point::new(12.0, 12.0));
        assert_eq!(pre.translate(&b, Point::new(1.0, 4.0)), Point::new(188.0, 88.0));
        assert_eq!(pre.translate(&b, Point::new(0.0, 2.0)), Point::new(100.0, 50.0));
    }

    #[test]
    fn degenerate_axis_goes_to_centre() {
        let pre = PreRenderer::new(200.0, 100.0);
        let b = bounds(3.0, 3.0, 0.0, 1.0);
        let p = pre.translate(&b, Point::new(3.0, 1.0));
        assert_eq!(p, Point::new(100.0, 88.0));
    }

    #[test]
    fn custom_radius() {
        let pre = PreRenderer::new(100.0, 100.0).with_radius(0.0);
        let b = bounds(0.0, 1.0, 0.0, 1.0);
        assert_eq!(pre.translate(&b, Point::new(1.0, 1.0)), Point::new(100.0, 100.0));
    }
}
