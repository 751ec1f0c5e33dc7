//! Forces acting on edge subdivision points.

use crate::geometry::edge_length;
use crate::params::TunableParameters;
use kurbo::{Line, Point, Vec2};

/// Spring force pulling `points[index]` towards the midpoint of its neighbours.
///
/// `index` must be an interior index.
pub fn spring_force(points: &[Point], index: usize, stiffness: f64) -> Vec2 {
    let previous = points[index - 1];
    let current = points[index];
    let next = points[index + 1];
    ((previous - current) + (next - current)) * stiffness
}

/// Sum of unit vectors from `subdivisions[edge][index]` towards the same-index
/// point of every compatible edge. Pairs closer than `threshold` on both axes
/// are skipped.
pub fn electrostatic_force(
    subdivisions: &[Vec<Point>],
    compatible: &[usize],
    edge: usize,
    index: usize,
    threshold: f64,
) -> Vec2 {
    let current = subdivisions[edge][index];
    compatible.iter().fold(Vec2::ZERO, |total, &other| {
        let force = subdivisions[other][index] - current;
        if force.x.abs() > threshold || force.y.abs() > threshold {
            total + force / force.hypot()
        } else {
            total
        }
    })
}

/// Displacement of every subdivision point of `edge` for one force pass.
///
/// The returned vector has one entry per point; the endpoints always get
/// `Vec2::ZERO` so edges stay attached to their nodes.
pub fn subdivision_forces(
    subdivisions: &[Vec<Point>],
    compatible: &[usize],
    edge: usize,
    segment: Line,
    step_size: f64,
    parameters: &TunableParameters,
) -> Vec<Vec2> {
    let points = &subdivisions[edge];
    let interior = points.len().saturating_sub(2);
    let stiffness = parameters.bundling_stiffness
        / (edge_length(segment.p0, segment.p1, parameters.length_tolerance)
            * (interior + 1) as f64);

    let mut forces = Vec::with_capacity(points.len());
    forces.push(Vec2::ZERO);
    for index in 1..=interior {
        let spring = spring_force(points, index, stiffness);
        let electrostatic = electrostatic_force(subdivisions, compatible, edge, index, step_size);
        forces.push((spring + electrostatic) * step_size);
    }
    if points.len() > 1 {
        forces.push(Vec2::ZERO);
    }
    forces
}
