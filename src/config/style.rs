use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::assets::logo::LogoImage;
use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Line terminator used when joining sanitized payload lines.
pub const PAYLOAD_LINE_TERMINATOR: &str = "\r\n";

/// Highest symbol version (`typeNumber`) a QR code can have.
pub const MAX_TYPE_NUMBER: i16 = 40;

/// Styling and payload for one code instance.
///
/// The serde shape follows the JSON exported by the qr-code-styling designer, so an exported
/// `qr-options.json` deserializes directly. Values are immutable by convention: every change goes
/// through a `with_*` method that returns a new config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeStyleConfig {
    /// Render width in pixels.
    pub width: u32,
    /// Render height in pixels.
    pub height: u32,
    /// Native output the styling engine should produce.
    #[serde(rename = "type")]
    pub output: EngineOutputType,
    /// Quiet margin around the symbol, in pixels.
    pub margin: u32,
    /// Raw payload as typed by the user (see [`sanitize_payload`]).
    pub data: String,
    /// Data module styling.
    pub dots_options: DotsOptions,
    /// Finder pattern outer ring styling.
    pub corners_square_options: CornersSquareOptions,
    /// Finder pattern centre styling.
    pub corners_dot_options: CornersDotOptions,
    /// Background fill.
    pub background_options: BackgroundOptions,
    /// Symbol-level options.
    pub qr_options: QrOptions,
    /// Logo placement options.
    pub image_options: ImageOptions,
    /// Decoded logo, if any. Never part of the JSON shape.
    #[serde(skip)]
    pub logo: Option<Arc<LogoImage>>,
}

impl Default for CodeStyleConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            output: EngineOutputType::Svg,
            margin: 0,
            data: String::new(),
            dots_options: DotsOptions::default(),
            corners_square_options: CornersSquareOptions::default(),
            corners_dot_options: CornersDotOptions::default(),
            background_options: BackgroundOptions::default(),
            qr_options: QrOptions::default(),
            image_options: ImageOptions::default(),
            logo: None,
        }
    }
}

impl CodeStyleConfig {
    /// Return a copy with a new raw payload.
    pub fn with_data(&self, data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..self.clone()
        }
    }

    /// Return a copy rendering at `size_px x size_px`.
    pub fn with_size(&self, size_px: u32) -> Self {
        Self {
            width: size_px,
            height: size_px,
            ..self.clone()
        }
    }

    /// Return a copy with the given logo (or without one).
    pub fn with_logo(&self, logo: Option<Arc<LogoImage>>) -> Self {
        Self {
            logo,
            ..self.clone()
        }
    }

    /// Return a copy asking the engine for a different native output.
    pub fn with_output(&self, output: EngineOutputType) -> Self {
        Self {
            output,
            ..self.clone()
        }
    }

    /// The payload exactly as it is handed to the encoder.
    pub fn sanitized_data(&self) -> String {
        sanitize_payload(&self.data)
    }

    /// Check value ranges the engine relies on.
    pub fn validate(&self) -> QrFrameResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(QrFrameError::validation("width/height must be > 0"));
        }
        if self.margin.saturating_mul(2) >= self.width.min(self.height) {
            return Err(QrFrameError::validation(
                "margin leaves no room for the symbol",
            ));
        }
        if !(0..=MAX_TYPE_NUMBER).contains(&self.qr_options.type_number) {
            return Err(QrFrameError::validation(format!(
                "qrOptions.typeNumber must be within 0..={MAX_TYPE_NUMBER}"
            )));
        }
        let size = self.image_options.image_size;
        if !size.is_finite() || size <= 0.0 || size > 1.0 {
            return Err(QrFrameError::validation(
                "imageOptions.imageSize must be within (0, 1]",
            ));
        }
        for (field, gradient) in [
            ("dotsOptions", self.dots_options.gradient.as_ref()),
            (
                "cornersSquareOptions",
                self.corners_square_options.gradient.as_ref(),
            ),
            ("cornersDotOptions", self.corners_dot_options.gradient.as_ref()),
            (
                "backgroundOptions",
                self.background_options.gradient.as_ref(),
            ),
        ] {
            if let Some(g) = gradient {
                g.validate()
                    .map_err(|e| QrFrameError::validation(format!("{field}.gradient: {e}")))?;
            }
        }
        Ok(())
    }
}

/// Normalize a raw payload: trim every line and join with [`PAYLOAD_LINE_TERMINATOR`].
pub fn sanitize_payload(raw: &str) -> String {
    raw.split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(PAYLOAD_LINE_TERMINATOR)
}

/// Native output type requested from the styling engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineOutputType {
    /// The engine mounts an `<svg>` element.
    #[default]
    Svg,
    /// The engine mounts a raster canvas.
    Canvas,
}

/// Data module shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    /// Plain squares.
    #[default]
    Square,
    /// Circles.
    Dots,
    /// Neighbour-aware rounding with a quarter-module radius.
    Rounded,
    /// Neighbour-aware rounding with a half-module radius.
    ExtraRounded,
    /// Leaf shape: only top-left and bottom-right corners round.
    Classy,
    /// Leaf shape with fuller rounding.
    ClassyRounded,
}

/// Finder pattern outer ring shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareType {
    /// Square ring.
    Square,
    /// Circular ring.
    Dot,
    /// Rounded-rectangle ring.
    ExtraRounded,
}

/// Finder pattern centre shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotType {
    /// Square centre.
    Square,
    /// Circular centre.
    Dot,
}

/// Gradient flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    /// Linear gradient rotated by `rotation` radians.
    Linear,
    /// Radial gradient centred on the symbol.
    Radial,
}

/// One gradient stop.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Stop position in `0..=1`.
    pub offset: f64,
    /// CSS color.
    pub color: String,
}

/// Multi-stop color gradient.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    /// Linear or radial.
    #[serde(rename = "type")]
    pub kind: GradientType,
    /// Rotation in radians (linear only).
    #[serde(default)]
    pub rotation: f64,
    /// Ordered color stops.
    pub color_stops: Vec<ColorStop>,
}

impl Gradient {
    fn validate(&self) -> Result<(), String> {
        if self.color_stops.is_empty() {
            return Err("colorStops must not be empty".to_string());
        }
        if !self.rotation.is_finite() {
            return Err("rotation must be finite".to_string());
        }
        for stop in &self.color_stops {
            if !(0.0..=1.0).contains(&stop.offset) {
                return Err(format!("stop offset {} outside 0..=1", stop.offset));
            }
        }
        Ok(())
    }
}

/// Data module styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DotsOptions {
    /// Module shape.
    #[serde(rename = "type")]
    pub kind: DotType,
    /// Solid color, used when no gradient is set.
    pub color: String,
    /// Optional gradient overriding `color`.
    pub gradient: Option<Gradient>,
}

impl Default for DotsOptions {
    fn default() -> Self {
        Self {
            kind: DotType::Square,
            color: "#000000".to_string(),
            gradient: None,
        }
    }
}

/// Finder outer ring styling. Unset fields inherit from the data modules.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornersSquareOptions {
    /// Ring shape.
    #[serde(rename = "type")]
    pub kind: Option<CornerSquareType>,
    /// Solid color.
    pub color: Option<String>,
    /// Optional gradient.
    pub gradient: Option<Gradient>,
}

/// Finder centre styling. Unset fields inherit from the data modules.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornersDotOptions {
    /// Centre shape.
    #[serde(rename = "type")]
    pub kind: Option<CornerDotType>,
    /// Solid color.
    pub color: Option<String>,
    /// Optional gradient.
    pub gradient: Option<Gradient>,
}

/// Background styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundOptions {
    /// Solid color (`transparent` is allowed).
    pub color: String,
    /// Optional gradient.
    pub gradient: Option<Gradient>,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            gradient: None,
        }
    }
}

/// Error correction level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    #[default]
    Q,
    /// ~30% recovery.
    H,
}

/// Symbol-level options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrOptions {
    /// Symbol version; `0` selects the smallest version that fits.
    #[serde(deserialize_with = "deserialize_type_number")]
    pub type_number: i16,
    /// Encoding mode hint. The encoder always picks optimal segments, so this is informational.
    pub mode: Option<String>,
    /// Error correction level.
    pub error_correction_level: ErrorCorrection,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            type_number: 0,
            mode: Some("Byte".to_string()),
            error_correction_level: ErrorCorrection::Q,
        }
    }
}

/// Logo placement options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOptions {
    /// Hide data modules underneath the logo.
    pub hide_background_dots: bool,
    /// Logo box size as a fraction of the symbol size.
    pub image_size: f64,
    /// Clear margin around the logo, in pixels.
    pub margin: u32,
    /// Accepted for compatibility with exported designer JSON; unused.
    pub cross_origin: Option<String>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            hide_background_dots: true,
            image_size: 0.4,
            margin: 0,
            cross_origin: None,
        }
    }
}

/// Accept `typeNumber` as either a JSON integer or a decimal string.
fn deserialize_type_number<'de, D>(deserializer: D) -> Result<i16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n,
        Raw::Text(s) => s.trim().parse::<i64>().map_err(|e| {
            serde::de::Error::custom(format!("typeNumber '{s}' is not an integer: {e}"))
        })?,
    };
    i16::try_from(value)
        .map_err(|_| serde::de::Error::custom(format!("typeNumber {value} out of range")))
}

#[cfg(test)]
#[path = "../../tests/unit/config/style.rs"]
mod tests;
