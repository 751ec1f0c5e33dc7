//! SVG backend: a [`DrawingSurface`] that accumulates an SVG document.

use crate::surface::DrawingSurface;
use arna_core::{EdgeOptions, NodeOptions};
use kurbo::{BezPath, Point};
use std::fmt::Write;

const DEFAULT_NODE_FILL: &str = "#ffffff";
const DEFAULT_STROKE: &str = "#333333";
const DEFAULT_LINE_WIDTH: &str = "1";
const DEFAULT_FONT: &str = "sans-serif";
const DEFAULT_FONT_SIZE: &str = "12px";

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    background: Option<String>,
    body: String,
    finished: bool,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            body: String::new(),
            finished: false,
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Whether `finalize` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The complete SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
        );
        if let Some(background) = &self.background {
            let _ = writeln!(
                svg,
                "  <rect width=\"100%\" height=\"100%\" fill=\"{}\" />",
                escape(background)
            );
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawingSurface for SvgSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn draw_circle(&mut self, center: Point, radius: f64, options: &NodeOptions) {
        let fill = options.color.as_deref().unwrap_or(DEFAULT_NODE_FILL);
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" />",
            center.x,
            center.y,
            radius,
            escape(fill),
            DEFAULT_STROKE
        );
        if let Some(label) = &options.label {
            let font = options.font.as_deref().unwrap_or(DEFAULT_FONT);
            let size = options.font_size.as_deref().unwrap_or(DEFAULT_FONT_SIZE);
            let _ = writeln!(
                self.body,
                "  <text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
                center.x,
                center.y,
                escape(font),
                escape(size),
                escape(label)
            );
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, options: &EdgeOptions) {
        let _ = writeln!(
            self.body,
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {} />",
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_attributes(options)
        );
    }

    fn draw_polyline(&mut self, points: &[Point], options: &EdgeOptions) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        let mut path = BezPath::new();
        path.move_to(first);
        for &point in rest {
            path.line_to(point);
        }
        let _ = writeln!(
            self.body,
            "  <path d=\"{}\" fill=\"none\" {} />",
            path.to_svg(),
            stroke_attributes(options)
        );
    }

    fn finalize(&mut self) {
        self.finished = true;
    }
}

fn stroke_attributes(options: &EdgeOptions) -> String {
    format!(
        "stroke=\"{}\" stroke-width=\"{}\"",
        escape(options.color.as_deref().unwrap_or(DEFAULT_STROKE)),
        escape(options.line_width.as_deref().unwrap_or(DEFAULT_LINE_WIDTH))
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
