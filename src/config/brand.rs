use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::logo::{LogoImage, load_logo_or_none};
use crate::config::frames::{FrameCatalog, FrameRecord};
use crate::config::style::{
    CodeStyleConfig, CornerDotType, CornerSquareType, CornersDotOptions, CornersSquareOptions,
    DotType, DotsOptions,
};
use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Logo toggle and location.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Whether the brand uses a logo at all.
    pub enabled: bool,
    /// Logo file, relative to the settings file.
    pub path: Option<PathBuf>,
}

/// Everything a brand configures: code styling, frames and logo.
///
/// This is a plain value passed into the export session; nothing reads it from global state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSettings {
    /// Base styling for every render.
    #[serde(default)]
    pub qr_options: CodeStyleConfig,
    /// Available frames.
    pub frames: FrameCatalog,
    /// Frame selected when the caller does not name one.
    pub default_frame: String,
    /// Logo toggle.
    #[serde(default)]
    pub logo: LogoConfig,
}

impl BrandSettings {
    /// Stock settings: the three built-in frames and a rounded green-on-white code.
    pub fn builtin() -> Self {
        let qr_options = CodeStyleConfig {
            dots_options: DotsOptions {
                kind: DotType::Rounded,
                color: "#1bc073".to_string(),
                gradient: None,
            },
            corners_square_options: CornersSquareOptions {
                kind: Some(CornerSquareType::ExtraRounded),
                color: Some("#2a2a2a".to_string()),
                gradient: None,
            },
            corners_dot_options: CornersDotOptions {
                kind: Some(CornerDotType::Dot),
                color: Some("#2a2a2a".to_string()),
                gradient: None,
            },
            ..CodeStyleConfig::default()
        };
        Self {
            qr_options,
            frames: FrameCatalog::builtin(),
            default_frame: "elegant".to_string(),
            logo: LogoConfig::default(),
        }
    }

    /// Parse settings from a JSON reader and validate them.
    pub fn from_reader<R: std::io::Read>(r: R) -> QrFrameResult<Self> {
        let settings: Self = serde_json::from_reader(r)
            .map_err(|e| QrFrameError::validation(format!("parse brand settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> QrFrameResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            QrFrameError::validation(format!("open brand settings '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> QrFrameResult<()> {
        self.qr_options.validate()?;
        if !self.frames.contains(&self.default_frame) {
            return Err(QrFrameError::validation(format!(
                "defaultFrame '{}' is not in the frame catalog",
                self.default_frame
            )));
        }
        Ok(())
    }

    /// The frame used when none is requested.
    pub fn default_frame_record(&self) -> QrFrameResult<&FrameRecord> {
        self.frames.get(&self.default_frame)
    }

    /// Load the configured logo, resolving its path against `root`.
    ///
    /// Returns `None` when the logo is disabled, not requested, or fails to load.
    pub fn resolve_logo(&self, root: &Path, include: bool) -> Option<Arc<LogoImage>> {
        if !include || !self.logo.enabled {
            return None;
        }
        let rel = self.logo.path.as_ref()?;
        load_logo_or_none(&root.join(rel)).map(Arc::new)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/brand.rs"]
mod tests;
