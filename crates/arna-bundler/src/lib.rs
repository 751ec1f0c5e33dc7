//! Force-directed edge bundling for laid-out graphs, plus the 2D geometry
//! helpers shared with the layout engine.

pub mod bundler;
pub mod compatibility;
pub mod geometry;
pub mod params;
pub mod physics;

pub use bundler::{EdgeBundler, EdgeCompatibilityList, EdgeSubdivisionPoints, MAX_SUBDIVISIONS};
pub use params::TunableParameters;

// Re-export kurbo geometry types so downstream crates share one definition.
pub use kurbo::{Line, Point, Vec2};
