//! Rendering collaborators for laid-out graphs: fit-to-surface pre-render
//! pass, a backend-agnostic renderer, an SVG backend, and hit testing.

pub mod hit;
pub mod prerender;
pub mod renderer;
pub mod surface;
pub mod svg;

pub use hit::{hit_test, hit_test_rect};
pub use prerender::{DEFAULT_RADIUS, PreRenderer, RenderParameters};
pub use renderer::Renderer;
pub use surface::{DrawCommand, DrawingSurface, RecordingSurface};
pub use svg::SvgSurface;
