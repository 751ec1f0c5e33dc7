//! Tunable parameters of the bundling schedule.

use serde::{Deserialize, Serialize};

/// Knobs of the FDEB refinement schedule.
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunableParameters {
    /// Spring constant `K` between consecutive subdivision points.
    pub bundling_stiffness: f64,
    /// Initial step size `S`, halved after every cycle.
    pub initial_step_size: f64,
    /// Interior subdivision points per edge in the first cycle.
    pub initial_subdivision: u32,
    /// Multiplier applied to the subdivision count after every cycle.
    pub subdivision_rate: u32,
    /// Number of refinement cycles.
    pub cycle_count: u32,
    /// Force passes in the first cycle (rounded per cycle).
    pub initial_iteration_count: f64,
    /// Multiplier applied to the pass count after every cycle.
    pub iteration_decrease_rate: f64,
    /// Minimum compatibility score for two edges to attract each other.
    pub compatibility_threshold: f64,
    /// Floor for edge lengths; keeps divisions finite.
    pub length_tolerance: f64,
}

impl Default for TunableParameters {
    fn default() -> Self {
        Self {
            bundling_stiffness: 0.1,
            initial_step_size: 0.1,
            initial_subdivision: 1,
            subdivision_rate: 2,
            cycle_count: 6,
            initial_iteration_count: 90.0,
            iteration_decrease_rate: 2.0 / 3.0,
            compatibility_threshold: 0.6,
            length_tolerance: 1e-6,
        }
    }
}
