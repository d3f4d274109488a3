/// Pixel buffer helpers shared by the renderer and compositor.
pub mod core;
/// Crate-wide error taxonomy.
pub mod error;
/// XML escaping and number formatting for generated markup.
pub mod xml;
