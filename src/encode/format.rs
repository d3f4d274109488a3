use std::fmt;
use std::str::FromStr;

use crate::compose::compositor::OutputKind;
use crate::foundation::error::QrFrameError;

/// Export target format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Lossless PNG.
    Png,
    /// JPEG at quality 0.95.
    Jpeg,
    /// SVG document.
    Svg,
}

impl ExportFormat {
    /// Every format, in menu order.
    pub const ALL: [Self; 3] = [Self::Png, Self::Jpeg, Self::Svg];

    /// MIME type of the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Encoder quality in `0.0..=1.0`; `None` when the format has no such notion.
    pub fn quality(self) -> Option<f32> {
        match self {
            Self::Png => Some(1.0),
            Self::Jpeg => Some(0.95),
            Self::Svg => None,
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
        }
    }

    /// Artifact kind the compositor must produce for this format.
    pub fn output_kind(self) -> OutputKind {
        match self {
            Self::Png | Self::Jpeg => OutputKind::Raster,
            Self::Svg => OutputKind::Vector,
        }
    }

    /// Upper-case name used in user-facing notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Svg => "SVG",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = QrFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            other => Err(QrFrameError::validation(format!(
                "unknown export format '{other}' (expected png, jpeg or svg)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;
