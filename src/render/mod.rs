//! Code rendering.
//!
//! [`CodeRenderer`](renderer::CodeRenderer) drives a styling engine into a scoped
//! [`RenderSurface`](surface::RenderSurface) and normalizes whatever it mounted into an opaque,
//! exact-size bitmap.

/// Invocation generation counter and tokens.
pub mod generation;
/// Renderer and normalized bitmap.
pub mod renderer;
/// Scoped off-screen surfaces.
pub mod surface;
