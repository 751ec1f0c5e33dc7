//! Drawing-surface abstraction implemented by concrete backends.

use arna_core::{EdgeOptions, NodeOptions};
use kurbo::Point;

/// A 2D target the [`crate::Renderer`] draws into. Coordinates are pixels,
/// origin top-left.
pub trait DrawingSurface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Node circle; the backend decides how to show `label`, `font` and friends.
    fn draw_circle(&mut self, center: Point, radius: f64, options: &NodeOptions);

    fn draw_line(&mut self, from: Point, to: Point, options: &EdgeOptions);

    /// Connected path through `points` in order.
    fn draw_polyline(&mut self, points: &[Point], options: &EdgeOptions);

    /// Called once after everything has been drawn.
    fn finalize(&mut self) {}
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Point,
        radius: f64,
        options: NodeOptions,
    },
    Line {
        from: Point,
        to: Point,
        options: EdgeOptions,
    },
    Polyline {
        points: Vec<Point>,
        options: EdgeOptions,
    },
    Finalize,
}

/// Surface that only records the calls it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn draw_circle(&mut self, center: Point, radius: f64, options: &NodeOptions) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            options: options.clone(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, options: &EdgeOptions) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            options: options.clone(),
        });
    }

    fn draw_polyline(&mut self, points: &[Point], options: &EdgeOptions) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            options: options.clone(),
        });
    }

    fn finalize(&mut self) {
        self.commands.push(DrawCommand::Finalize);
    }
}
