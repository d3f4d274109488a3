//! Export encoding and save targets.
//!
//! The exporter turns a composite artifact into PNG, JPEG or SVG bytes; a [`SaveTarget`] receives
//! the named result.

/// Artifact serialization and file naming.
pub mod exporter;
/// Export formats.
pub mod format;
/// Save targets.
pub mod sink;

pub use exporter::{ExportedFile, export_artifact, file_name_for};
pub use format::ExportFormat;
pub use sink::{DirectoryTarget, MemoryTarget, SaveTarget};
