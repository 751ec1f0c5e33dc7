//! Geometric edge-compatibility measures.
//!
//! Each measure lies in `[0, 1]`; their product decides whether two edges
//! may attract each other during bundling.

use crate::geometry::{
    dot, edge_length, edge_vector, euclidean_distance, midpoint, project_point_on_line,
};
use kurbo::Line;

/// `|cos θ|` between the two edge directions.
pub fn angle_compatibility(p: Line, q: Line, tolerance: f64) -> f64 {
    let lengths = edge_length(p.p0, p.p1, tolerance) * edge_length(q.p0, q.p1, tolerance);
    let product = dot(edge_vector(p.p0, p.p1), edge_vector(q.p0, q.p1));
    (product / lengths).abs()
}

/// Symmetric length ratio; 1 for equal lengths, falling towards 0 as they diverge.
pub fn scale_compatibility(p: Line, q: Line, tolerance: f64) -> f64 {
    let p_len = edge_length(p.p0, p.p1, tolerance);
    let q_len = edge_length(q.p0, q.p1, tolerance);
    let average = (p_len + q_len) / 2.0;
    2.0 / (average / p_len.min(q_len) + p_len.max(q_len) / average)
}

/// `avg / (avg + |mid(p) - mid(q)|)`.
pub fn position_compatibility(p: Line, q: Line, tolerance: f64) -> f64 {
    let p_len = edge_length(p.p0, p.p1, tolerance);
    let q_len = edge_length(q.p0, q.p1, tolerance);
    let average = (p_len + q_len) / 2.0;
    let distance = euclidean_distance(midpoint(p.p0, p.p1), midpoint(q.p0, q.p1));
    average / (average + distance)
}

/// Visibility of `q` as seen from `p`, clamped at 0.
pub fn edge_visibility(p: Line, q: Line) -> f64 {
    let tail = project_point_on_line(q.p0, p);
    let head = project_point_on_line(q.p1, p);
    let projected_mid = midpoint(tail, head);
    let offset = euclidean_distance(midpoint(p.p0, p.p1), projected_mid);
    let projected_len = euclidean_distance(tail, head);
    // NaN (degenerate projection) also collapses to 0 here.
    (1.0 - 2.0 * offset / projected_len).max(0.0)
}

pub fn visibility_compatibility(p: Line, q: Line) -> f64 {
    edge_visibility(p, q).min(edge_visibility(q, p))
}

/// Product of the four measures.
pub fn compatibility_score(p: Line, q: Line, tolerance: f64) -> f64 {
    angle_compatibility(p, q, tolerance)
        * scale_compatibility(p, q, tolerance)
        * position_compatibility(p, q, tolerance)
        * visibility_compatibility(p, q)
}
