//! qrframe renders styled QR codes, merges them into decorative frames and exports the result as
//! PNG, JPEG or SVG.
//!
//! The pipeline is session-oriented:
//!
//! - Describe the brand with [`BrandSettings`] (styling, frame catalog, logo)
//! - Create an [`ExportSession`] around a [`StylingEngine`] and a [`SaveTarget`]
//! - Install a [`CodeStyleConfig`] and call [`ExportSession::export`] per frame and format
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Logo decoding, SVG rasterization and data URLs.
pub mod assets;
/// Frame compositing.
pub mod compose;
/// Configuration models.
pub mod config;
/// Export encoding and save targets.
pub mod encode;
/// Styling engine seam and the stock engine.
pub mod engine;
/// Shared pixel helpers and the error taxonomy.
pub mod foundation;
/// Code rendering.
pub mod render;
/// Export sessions.
pub mod session;

pub use crate::compose::compositor::{
    CompositeArtifact, OutputKind, RasterArtifact, VectorArtifact, compose,
};
pub use crate::config::brand::{BrandSettings, LogoConfig};
pub use crate::config::frames::{FrameCatalog, FrameRecord, Placement, PreviewFractions};
pub use crate::config::style::{CodeStyleConfig, EngineOutputType, sanitize_payload};
pub use crate::encode::{
    DirectoryTarget, ExportFormat, ExportedFile, MemoryTarget, SaveTarget, export_artifact,
    file_name_for,
};
pub use crate::engine::{EngineOptions, RenderedElement, StyledEngine, StylingEngine, VectorNode};
pub use crate::foundation::error::{ErrorKind, QrFrameError, QrFrameResult};
pub use crate::render::renderer::{CodeRenderer, NormalizedBitmap};
pub use crate::render::surface::{RenderSurface, SurfaceRegistry};
pub use crate::session::export_session::ExportSession;
pub use crate::session::state::{ExportOutcome, ExportReport, ExportState};
