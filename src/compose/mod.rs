//! Frame compositing.
//!
//! A normalized code bitmap is merged with a frame record into either a flat raster canvas or an
//! SVG document tree that embeds the code as one image region.

/// Pixel blending helpers.
pub mod blend;
/// Raster and vector composition.
pub mod compositor;
/// Owned SVG element tree.
pub mod svg_tree;
