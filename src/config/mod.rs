/// Brand-level settings bundle.
pub mod brand;
/// Frame records and the frame catalog.
pub mod frames;
/// Code styling configuration.
pub mod style;
