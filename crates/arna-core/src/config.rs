//! Layout parameters and pipeline options.
//!
//! Everything here deserializes with `#[serde(default)]`, so a partial JSON
//! config only needs the fields it changes.

use serde::{Deserialize, Serialize};

/// Force-directed layout constants, plus the graph-level `bundle` switch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParameters {
    pub bundle: bool,
    /// Number of simulation ticks run by `compute_layout`.
    pub max_ticks: u32,
    /// Pairs farther apart than this do not repel; attraction distance is clamped to it.
    pub max_repulsive_distance: f64,
    /// Ideal edge length `k`.
    pub optimal_distance: f64,
    /// Damping factor `c` applied to the accumulated force on commit.
    #[serde(alias = "c")]
    pub damping: f64,
    /// Per-axis cap on a node's displacement in one tick.
    pub max_vertex_displacement: f64,
    /// When set, initial coordinates are drawn from `[-s, s]`.
    pub initial_spread: Option<f64>,
}

impl Default for GraphParameters {
    fn default() -> Self {
        Self {
            bundle: false,
            max_ticks: 500,
            max_repulsive_distance: 6.0,
            optimal_distance: 2.0,
            damping: 0.01,
            max_vertex_displacement: 0.5,
            initial_spread: None,
        }
    }
}

impl GraphParameters {
    /// Interval initial node coordinates are sampled from, `(low, high)`.
    pub fn placement_range(&self) -> (f64, f64) {
        match self.initial_spread {
            Some(spread) => (-spread.abs(), spread.abs()),
            None => (-self.max_repulsive_distance, self.max_vertex_displacement),
        }
    }
}

/// Field-by-field overrides layered over [`GraphParameters::default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParameterOverrides {
    pub bundle: Option<bool>,
    pub max_ticks: Option<u32>,
    pub max_repulsive_distance: Option<f64>,
    pub optimal_distance: Option<f64>,
    #[serde(alias = "c")]
    pub damping: Option<f64>,
    pub max_vertex_displacement: Option<f64>,
    pub initial_spread: Option<f64>,
}

impl GraphParameterOverrides {
    pub fn apply_to(&self, base: GraphParameters) -> GraphParameters {
        GraphParameters {
            bundle: self.bundle.unwrap_or(base.bundle),
            max_ticks: self.max_ticks.unwrap_or(base.max_ticks),
            max_repulsive_distance: self
                .max_repulsive_distance
                .unwrap_or(base.max_repulsive_distance),
            optimal_distance: self.optimal_distance.unwrap_or(base.optimal_distance),
            damping: self.damping.unwrap_or(base.damping),
            max_vertex_displacement: self
                .max_vertex_displacement
                .unwrap_or(base.max_vertex_displacement),
            initial_spread: self.initial_spread.or(base.initial_spread),
        }
    }
}

/// Options for [`crate::compile`] and [`crate::semantics::analyze`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    pub parameters: GraphParameterOverrides,
    /// Seed for initial placement and jitter; entropy when `None`.
    pub seed: Option<u64>,
}

impl CompileOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: GraphParameterOverrides) -> Self {
        self.parameters = parameters;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let p = GraphParameters::default();
        assert!(!p.bundle);
        assert_eq!(p.max_ticks, 500);
        assert_eq!(p.max_repulsive_distance, 6.0);
        assert_eq!(p.optimal_distance, 2.0);
        assert_eq!(p.damping, 0.01);
        assert_eq!(p.max_vertex_displacement, 0.5);
        assert_eq!(p.placement_range(), (-6.0, 0.5));
    }

    #[test]
    fn initial_spread_overrides_placement_range() {
        let p = GraphParameters {
            initial_spread: Some(3.0),
            ..GraphParameters::default()
        };
        assert_eq!(p.placement_range(), (-3.0, 3.0));
    }

    #[test]
    fn overrides_only_touch_set_fields() {
        let overrides = GraphParameterOverrides {
            max_ticks: Some(10),
            bundle: Some(true),
            ..GraphParameterOverrides::default()
        };
        let p = overrides.apply_to(GraphParameters::default());
        assert_eq!(p.max_ticks, 10);
        assert!(p.bundle);
        assert_eq!(p.optimal_distance, 2.0);
    }

    #[test]
    fn seeded_options() {
        let options = CompileOptions::seeded(7);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.parameters, GraphParameterOverrides::default());
    }
}
