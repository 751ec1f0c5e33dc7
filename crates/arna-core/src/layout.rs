//! Force-directed layout (Fruchterman–Reingold style).
//!
//! Each tick accumulates forces on every node, then commits them:
//!
//! 1. **Repulsion** between every unordered node pair closer than
//!    `max_repulsive_distance`, magnitude `k² / d`.
//! 2. **Attraction** along every edge, magnitude `(d² − k²) / k` scaled by
//!    the edge weight, with `d` clamped to `max_repulsive_distance`.
//! 3. **Commit**: displacement `damping × force`, clamped per axis to
//!    `±max_vertex_displacement`; forces reset and bounds are recomputed.
//!
//! Nodes closer than `0.1` (coincident or nearly so) use a small random
//! separation vector instead of their true offset.

use crate::model::{Graph, LayoutBounds};
use arna_bundler::{Point, Vec2};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rand::Rng;

/// Squared distance below which two positions count as coincident.
const COINCIDENT_DISTANCE_SQ: f64 = 0.01;

/// Iterative layout over a mutable graph.
pub trait LayoutEngine {
    /// Run one accumulate-and-commit step.
    fn tick(&mut self);

    /// Number of ticks `compute_layout` runs.
    fn max_ticks(&self) -> u32;

    /// Run the whole simulation.
    fn compute_layout(&mut self) {
        for _ in 0..self.max_ticks() {
            self.tick();
        }
    }
}

impl LayoutEngine for Graph {
    fn tick(&mut self) {
        self.apply_repulsion();
        self.apply_attraction();
        self.commit_forces();
    }

    fn max_ticks(&self) -> u32 {
        self.parameters.max_ticks
    }

    fn compute_layout(&mut self) {
        let ticks = self.max_ticks();
        for _ in 0..ticks {
            self.tick();
        }
        log::debug!(
            "layout `{}`: {} ticks over {} nodes / {} edges, bounds {:?}",
            self.name,
            ticks,
            self.node_count(),
            self.edge_count(),
            self.bounds
        );
    }
}

/// Multiplier applied to an edge's attraction: `1 + 0.5 ln(w)`.
///
/// Non-finite or non-positive weights count as `1`.
pub fn attraction_scale(weight: f64) -> f64 {
    let weight = if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    };
    1.0 + 0.5 * weight.ln()
}

/// `to - from`, or a jitter vector in `[0.1, 0.2)²` when the points are
/// closer than `0.1`.
fn separation(from: Point, to: Point, rng: &mut impl Rng) -> Vec2 {
    let delta = to - from;
    if delta.hypot2() < COINCIDENT_DISTANCE_SQ {
        Vec2::new(rng.gen_range(0.1..0.2), rng.gen_range(0.1..0.2))
    } else {
        delta
    }
}

/// Clamp to `[-limit, limit]` without panicking on a bad limit.
fn clamp_axis(value: f64, limit: f64) -> f64 {
    let limit = limit.abs();
    value.max(-limit).min(limit)
}

impl Graph {
    fn apply_repulsion(&mut self) {
        let k_squared = self.parameters.optimal_distance.powi(2);
        let max_distance = self.parameters.max_repulsive_distance;
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();

        for (i, &first) in indices.iter().enumerate() {
            for &second in &indices[..i] {
                let delta = separation(
                    self.graph[first].position,
                    self.graph[second].position,
                    &mut self.rng,
                );
                let distance = delta.hypot();
                if distance < max_distance {
                    // Unit direction × k²/d.
                    let push = delta * (k_squared / (distance * distance));
                    self.graph[second].force += push;
                    self.graph[first].force -= push;
                }
            }
        }
    }

    fn apply_attraction(&mut self) {
        let k = self.parameters.optimal_distance;
        let max_distance = self.parameters.max_repulsive_distance;
        let edges: Vec<(NodeIndex, NodeIndex, f64)> = self
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight().attraction))
            .collect();

        for (tail, head, weight) in edges {
            let delta = separation(
                self.graph[tail].position,
                self.graph[head].position,
                &mut self.rng,
            );
            let distance = delta.hypot();
            let clamped = distance.min(max_distance);
            let magnitude = (clamped * clamped - k * k) / k * attraction_scale(weight);
            let pull = delta * (magnitude / distance);
            self.graph[head].force -= pull;
            self.graph[tail].force += pull;
        }
    }

    fn commit_forces(&mut self) {
        let damping = self.parameters.damping;
        let limit = self.parameters.max_vertex_displacement;
        let mut bounds = LayoutBounds::EMPTY;

        for node in self.graph.node_weights_mut() {
            let displacement = Vec2::new(
                clamp_axis(damping * node.force.x, limit),
                clamp_axis(damping * node.force.y, limit),
            );
            node.position += displacement;
            node.force = Vec2::ZERO;
            bounds.include(node.position);
        }
        self.bounds = bounds;
    }
}
