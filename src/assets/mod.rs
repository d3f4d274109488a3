/// PNG and data-URL helpers.
pub mod codec;
/// Logo loading and decoding.
pub mod logo;
/// SVG parsing and rasterization on top of `usvg`/`resvg`.
pub mod svg_raster;
