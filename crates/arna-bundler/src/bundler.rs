//! Force-directed edge bundling (FDEB).
//!
//! Edges are split into subdivision points that are pulled towards the
//! matching points of geometrically compatible edges. Each cycle halves the
//! step size, multiplies the subdivision count, and shrinks the number of
//! force passes, so the paths settle into smooth bundles.

use crate::compatibility::compatibility_score;
use crate::geometry::subdivide;
use crate::params::TunableParameters;
use crate::physics::subdivision_forces;
use kurbo::{Line, Point, Vec2};
use smallvec::SmallVec;

/// Ordered points of one edge, tail to head inclusive.
pub type EdgeSubdivisionPoints = Vec<Point>;

/// Indices of the edges compatible with a given edge.
pub type EdgeCompatibilityList = SmallVec<[usize; 8]>;

/// Upper bound on interior points per edge.
pub const MAX_SUBDIVISIONS: usize = 4096;

/// Runs the bundling schedule over a fixed set of straight edges.
#[derive(Debug, Clone)]
pub struct EdgeBundler {
    parameters: TunableParameters,
    /// Number of edges handed to `new`, including excluded ones.
    input_len: usize,
    /// Input index of every kept edge.
    kept: Vec<usize>,
    segments: Vec<Line>,
    subdivisions: Vec<EdgeSubdivisionPoints>,
    compatibility: Vec<EdgeCompatibilityList>,
}

impl EdgeBundler {
    /// Prepare a bundler. Edges whose endpoints coincide are excluded up front.
    pub fn new(edges: impl IntoIterator<Item = Line>, parameters: TunableParameters) -> Self {
        let mut input_len = 0;
        let mut kept = Vec::new();
        let mut segments = Vec::new();

        for (index, edge) in edges.into_iter().enumerate() {
            input_len += 1;
            if edge.p0 == edge.p1 {
                log::trace!("bundler: excluding degenerate edge #{index}");
                continue;
            }
            kept.push(index);
            segments.push(edge);
        }

        Self {
            parameters,
            input_len,
            kept,
            segments,
            subdivisions: Vec::new(),
            compatibility: Vec::new(),
        }
    }

    pub fn parameters(&self) -> &TunableParameters {
        &self.parameters
    }

    /// Number of edges that take part in bundling.
    pub fn bundled_edge_count(&self) -> usize {
        self.segments.len()
    }

    /// Compatibility lists of the kept edges, indexed in kept order.
    ///
    /// Empty until `compute_compatibility` (or `bundle`) has run.
    pub fn compatibility(&self) -> &[EdgeCompatibilityList] {
        &self.compatibility
    }

    /// Fill the compatibility lists from the straight, unsubdivided edges.
    pub fn compute_compatibility(&mut self) {
        let count = self.segments.len();
        let tolerance = self.parameters.length_tolerance;
        let threshold = self.parameters.compatibility_threshold;
        self.compatibility = vec![EdgeCompatibilityList::new(); count];

        for p in 0..count {
            for q in (p + 1)..count {
                let score = compatibility_score(self.segments[p], self.segments[q], tolerance);
                if score >= threshold {
                    self.compatibility[p].push(q);
                    self.compatibility[q].push(p);
                }
            }
        }

        let pairs: usize = self.compatibility.iter().map(|c| c.len()).sum::<usize>() / 2;
        log::debug!("bundler: {pairs} compatible edge pairs among {count} edges");
    }

    /// Run every cycle and return one polyline per input edge, in input order.
    ///
    /// Excluded edges get an empty polyline. With `cycle_count == 0` every
    /// kept edge is returned as its straight two-point polyline.
    pub fn bundle(mut self) -> Vec<EdgeSubdivisionPoints> {
        if self.parameters.cycle_count == 0 {
            self.subdivisions = self.segments.iter().map(|s| vec![s.p0, s.p1]).collect();
            return self.into_output();
        }

        let mut step_size = self.parameters.initial_step_size;
        let mut iterations = self.parameters.initial_iteration_count;
        let mut subdivision_count =
            (self.parameters.initial_subdivision as usize).min(MAX_SUBDIVISIONS);

        self.subdivisions = self
            .segments
            .iter()
            .map(|s| subdivide(&[s.p0, s.p1], subdivision_count))
            .collect();
        self.compute_compatibility();

        for cycle in 0..self.parameters.cycle_count {
            let passes = iterations.round().max(0.0) as usize;
            log::debug!(
                "bundler: cycle {cycle}: {passes} passes, {subdivision_count} subdivisions, step {step_size}"
            );
            for _ in 0..passes {
                self.apply_forces(step_size);
            }

            step_size /= 2.0;
            subdivision_count = subdivision_count
                .saturating_mul(self.parameters.subdivision_rate as usize)
                .min(MAX_SUBDIVISIONS);
            iterations *= self.parameters.iteration_decrease_rate;
            self.subdivisions = self
                .subdivisions
                .iter()
                .map(|points| subdivide(points, subdivision_count))
                .collect();
        }

        self.into_output()
    }

    /// One force pass: every displacement is computed before any point moves.
    fn apply_forces(&mut self, step_size: f64) {
        let forces: Vec<Vec<Vec2>> = (0..self.segments.len())
            .map(|edge| {
                subdivision_forces(
                    &self.subdivisions,
                    &self.compatibility[edge],
                    edge,
                    self.segments[edge],
                    step_size,
                    &self.parameters,
                )
            })
            .collect();

        for (points, displacements) in self.subdivisions.iter_mut().zip(forces) {
            for (point, displacement) in points.iter_mut().zip(displacements) {
                *point += displacement;
            }
        }
    }

    fn into_output(self) -> Vec<EdgeSubdivisionPoints> {
        let mut output = vec![EdgeSubdivisionPoints::new(); self.input_len];
        for (index, points) in self.kept.into_iter().zip(self.subdivisions) {
            output[index] = points;
        }
        output
    }
}
