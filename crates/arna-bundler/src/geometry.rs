//! Stateless 2D geometry shared by the layout engine and the edge bundler.
//!
//! Points and vectors are `kurbo` types; everything here is a pure function.

use kurbo::{Line, Point, Vec2};

/// Vector pointing from `tail` to `head`.
pub fn edge_vector(tail: Point, head: Point) -> Vec2 {
    head - tail
}

/// Dot product of two vectors.
pub fn dot(a: Vec2, b: Vec2) -> f64 {
    a.x * b.x + a.y * b.y
}

pub fn euclidean_distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Length of the edge `tail → head`, floored at `tolerance`.
///
/// When the endpoints are closer than `tolerance` on both axes the tolerance
/// itself is returned, never zero, so the result is always safe to divide by.
pub fn edge_length(tail: Point, head: Point, tolerance: f64) -> f64 {
    if (tail.x - head.x).abs() < tolerance && (tail.y - head.y).abs() < tolerance {
        return tolerance;
    }
    tail.distance(head)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}

/// Total arc length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Orthogonal projection of `p` onto the infinite line through `line`.
///
/// A zero-length `line` yields non-finite coordinates; callers treat that as
/// "no meaningful overlap".
pub fn project_point_on_line(p: Point, line: Line) -> Point {
    let direction = line.p1 - line.p0;
    let r = dot(p - line.p0, direction) / direction.hypot2();
    line.p0 + direction * r
}

/// Resample a polyline so it has exactly `count` interior points placed at
/// equal arc-length intervals. The first and last points are kept as-is.
pub fn subdivide(polyline: &[Point], count: usize) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (polyline.first(), polyline.last()) else {
        return Vec::new();
    };

    let segment_length = polyline_length(polyline) / (count + 1) as f64;
    let mut points = Vec::with_capacity(count + 2);
    points.push(first);

    let mut segments = polyline.windows(2).map(|w| (w[0], w[1]));
    let mut current = segments.next();
    // Arc length covered by the segments before `current`.
    let mut walked = 0.0;

    for k in 1..=count {
        let target = segment_length * k as f64;
        loop {
            let Some((a, b)) = current else {
                // Rounding left us short of the final target.
                points.push(last);
                break;
            };
            let length = a.distance(b);
            if walked + length >= target {
                let t = if length > 0.0 {
                    (target - walked) / length
                } else {
                    0.0
                };
                points.push(a.lerp(b, t.clamp(0.0, 1.0)));
                break;
            }
            walked += length;
            current = segments.next();
        }
    }

    points.push(last);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn edge_length_floors_at_tolerance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(1.0 + 1e-8, 1.0 - 1e-8);
        assert_eq!(edge_length(a, b, 1e-6), 1e-6);
        assert_eq!(edge_length(a, a, 1e-6), 1e-6);
    }

    #[test]
    fn edge_length_is_euclidean_above_tolerance() {
        let len = edge_length(Point::new(0.0, 0.0), Point::new(3.0, 4.0), 1e-6);
        assert!(close(len, 5.0));
    }

    #[test]
    fn edge_length_only_floors_when_both_axes_are_close() {
        let len = edge_length(Point::new(0.0, 0.0), Point::new(0.0, 2.0), 1e-6);
        assert!(close(len, 2.0));
    }

    #[test]
    fn dot_product_uses_both_axes() {
        assert!(close(dot(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)), 11.0));
        assert!(close(dot(Vec2::new(1.0, 0.0), Vec2::new(0.0, 5.0)), 0.0));
    }

    #[test]
    fn polyline_length_sums_segments() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 10.0),
        ];
        assert!(close(polyline_length(&points), 11.0));
        assert_eq!(polyline_length(&points[..1]), 0.0);
    }

    #[test]
    fn projection_onto_horizontal_line() {
        let line = Line::new((0.0, 0.0), (10.0, 0.0));
        let p = project_point_on_line(Point::new(4.0, 7.0), line);
        assert!(close(p.x, 4.0));
        assert!(close(p.y, 0.0));
    }

    #[test]
    fn projection_extends_past_segment_ends() {
        let line = Line::new((0.0, 0.0), (1.0, 1.0));
        let p = project_point_on_line(Point::new(4.0, 2.0), line);
        assert!(close(p.x, 3.0));
        assert!(close(p.y, 3.0));
    }

    #[test]
    fn subdivide_straight_edge_once_yields_midpoint() {
        let points = subdivide(&[Point::new(0.0, 0.0), Point::new(4.0, 2.0)], 1);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert!(close(points[1].x, 2.0) && close(points[1].y, 1.0));
        assert_eq!(points[2], Point::new(4.0, 2.0));
    }

    #[test]
    fn subdivide_keeps_shape_of_bent_polyline() {
        let bent = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
        ];
        let points = subdivide(&bent, 3);
        assert_eq!(points.len(), 5);
        // Interior points at arc lengths 1, 2, 3.
        assert!(close(points[1].x, 1.0) && close(points[1].y, 0.0));
        assert!(close(points[2].x, 2.0) && close(points[2].y, 0.0));
        assert!(close(points[3].x, 2.0) && close(points[3].y, 1.0));
    }

    #[test]
    fn subdivide_always_produces_requested_count() {
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 0.3)];
        for count in [0, 1, 2, 7, 64, 129] {
            assert_eq!(subdivide(&line, count).len(), count + 2);
        }
    }

    #[test]
    fn subdivide_degenerate_input() {
        assert!(subdivide(&[], 3).is_empty());
        let p = Point::new(2.0, 2.0);
        assert_eq!(subdivide(&[p, p], 2), vec![p, p, p, p]);
    }
}
