use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};

use image::ImageEncoder as _;

use crate::assets::codec::encode_png;
use crate::compose::blend::flatten_onto;
use crate::compose::compositor::CompositeArtifact;
use crate::encode::format::ExportFormat;
use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Colour transparent pixels are flattened onto for JPEG output.
pub const JPEG_MATTE: [u8; 3] = [255, 255, 255];

/// Encoded export, named and ready to save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    /// `qr-code-<unix-ms>.<ext>`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Encoded payload.
    pub bytes: Vec<u8>,
}

/// Download name for an export started at `unix_ms`.
pub fn file_name_for(format: ExportFormat, unix_ms: u64) -> String {
    format!("qr-code-{unix_ms}.{}", format.extension())
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Serialize `artifact` as `format`.
///
/// Raster formats need a raster artifact and SVG needs a vector one; nothing is converted.
#[tracing::instrument(skip(artifact), fields(kind = ?artifact.kind()))]
pub fn export_artifact(artifact: &CompositeArtifact, format: ExportFormat) -> QrFrameResult<Vec<u8>> {
    match (format, artifact) {
        (ExportFormat::Png, CompositeArtifact::Raster(r)) => encode_png(&r.image),
        (ExportFormat::Jpeg, CompositeArtifact::Raster(r)) => encode_jpeg(&r.image, format),
        (ExportFormat::Svg, CompositeArtifact::Vector(v)) => Ok(v.root.to_document().into_bytes()),
        (format, artifact) => Err(QrFrameError::artifact_mismatch(format!(
            "{format} export needs a {:?} artifact, got {:?}",
            format.output_kind(),
            artifact.kind()
        ))),
    }
}

/// Encode and name `artifact` in one step.
pub fn export_file(
    artifact: &CompositeArtifact,
    format: ExportFormat,
    unix_ms: u64,
) -> QrFrameResult<ExportedFile> {
    Ok(ExportedFile {
        file_name: file_name_for(format, unix_ms),
        mime: format.mime(),
        bytes: export_artifact(artifact, format)?,
    })
}

fn encode_jpeg(img: &image::RgbaImage, format: ExportFormat) -> QrFrameResult<Vec<u8>> {
    let quality = format
        .quality()
        .map(|q| (q * 100.0).round().clamp(1.0, 100.0) as u8)
        .unwrap_or(95);
    let flat = flatten_onto(img, JPEG_MATTE);
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut out), quality)
        .write_image(
            flat.as_raw(),
            flat.width(),
            flat.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| QrFrameError::serialization(format!("encode jpeg: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/exporter.rs"]
mod tests;
