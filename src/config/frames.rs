use std::collections::BTreeMap;

use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Code placement rectangle inside a frame canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Side length of the square code region.
    #[serde(alias = "qrSize")]
    pub size: u32,
}

/// Placement expressed as fractions of the canvas, for scaled previews.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewFractions {
    /// `x / width`.
    pub left: f64,
    /// `y / height`.
    pub top: f64,
    /// `size / width`.
    pub width: f64,
    /// `size / height`.
    pub height: f64,
}

/// One decorative frame: background markup, canvas size and code placement.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRecord {
    /// Catalog key. Filled in from the map key when loaded.
    #[serde(skip)]
    pub id: String,
    /// Self-contained SVG document drawn under the code.
    #[serde(rename = "svg", alias = "background")]
    pub background: String,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Where the code goes.
    pub position: Placement,
}

impl FrameRecord {
    /// Build and validate a frame record.
    pub fn new(
        id: impl Into<String>,
        background: impl Into<String>,
        width: u32,
        height: u32,
        position: Placement,
    ) -> QrFrameResult<Self> {
        let rec = Self {
            id: id.into(),
            background: background.into(),
            width,
            height,
            position,
        };
        rec.validate()?;
        Ok(rec)
    }

    /// Check the canvas and that the placement rectangle fits inside it.
    pub fn validate(&self) -> QrFrameResult<()> {
        let id = &self.id;
        if self.width == 0 || self.height == 0 {
            return Err(QrFrameError::validation(format!(
                "frame '{id}' canvas width/height must be > 0"
            )));
        }
        if self.position.size == 0 {
            return Err(QrFrameError::validation(format!(
                "frame '{id}' placement size must be > 0"
            )));
        }
        let right = u64::from(self.position.x) + u64::from(self.position.size);
        let bottom = u64::from(self.position.y) + u64::from(self.position.size);
        if right > u64::from(self.width) || bottom > u64::from(self.height) {
            return Err(QrFrameError::validation(format!(
                "frame '{id}' placement {}x{}+{} does not fit in {}x{}",
                self.position.x, self.position.y, self.position.size, self.width, self.height
            )));
        }
        if self.background.trim().is_empty() {
            return Err(QrFrameError::validation(format!(
                "frame '{id}' background markup must be non-empty"
            )));
        }
        Ok(())
    }

    /// Placement relative to the canvas.
    pub fn preview_fractions(&self) -> PreviewFractions {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let p = self.position;
        PreviewFractions {
            left: f64::from(p.x) / w,
            top: f64::from(p.y) / h,
            width: f64::from(p.size) / w,
            height: f64::from(p.size) / h,
        }
    }
}

/// Named frames, validated once when the catalog is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(
    try_from = "BTreeMap<String, FrameRecord>",
    into = "BTreeMap<String, FrameRecord>"
)]
pub struct FrameCatalog {
    frames: BTreeMap<String, FrameRecord>,
}

impl FrameCatalog {
    /// Build a catalog, stamping each record with its key and validating it.
    pub fn new(frames: BTreeMap<String, FrameRecord>) -> QrFrameResult<Self> {
        let mut out = BTreeMap::new();
        for (id, mut rec) in frames {
            rec.id = id.clone();
            rec.validate()?;
            out.insert(id, rec);
        }
        Ok(Self { frames: out })
    }

    /// The stock frames: `none`, `elegant` and `minimal`.
    pub fn builtin() -> Self {
        let entries = [
            ("none", NONE_SVG, 3000, 3000, (350, 350, 2300)),
            ("elegant", ELEGANT_SVG, 3000, 4160, (350, 440, 2300)),
            ("minimal", MINIMAL_SVG, 6335, 3208, (650, 454, 2300)),
        ];
        let frames = entries
            .into_iter()
            .map(|(id, svg, width, height, (x, y, size))| {
                (
                    id.to_string(),
                    FrameRecord {
                        id: id.to_string(),
                        background: svg.to_string(),
                        width,
                        height,
                        position: Placement { x, y, size },
                    },
                )
            })
            .collect();
        Self { frames }
    }

    /// Return a catalog with `record` added (or replaced).
    pub fn with_frame(mut self, record: FrameRecord) -> QrFrameResult<Self> {
        record.validate()?;
        self.frames.insert(record.id.clone(), record);
        Ok(self)
    }

    /// Look up a frame by id.
    pub fn get(&self, id: &str) -> QrFrameResult<&FrameRecord> {
        self.frames
            .get(id)
            .ok_or_else(|| QrFrameError::frame_not_found(id))
    }

    /// Return `true` when `id` is in the catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.frames.contains_key(id)
    }

    /// Frame ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    /// Frames in id order.
    pub fn iter(&self) -> impl Iterator<Item = &FrameRecord> {
        self.frames.values()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when the catalog has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TryFrom<BTreeMap<String, FrameRecord>> for FrameCatalog {
    type Error = QrFrameError;

    fn try_from(frames: BTreeMap<String, FrameRecord>) -> QrFrameResult<Self> {
        Self::new(frames)
    }
}

impl From<FrameCatalog> for BTreeMap<String, FrameRecord> {
    fn from(catalog: FrameCatalog) -> Self {
        catalog.frames
    }
}

const NONE_SVG: &str = r#"<svg viewBox="0 0 3000 3000" xmlns="http://www.w3.org/2000/svg"><rect width="3000" height="3000" fill="white"/></svg>"#;

const ELEGANT_SVG: &str = r#"<svg width="3000" height="4160" viewBox="0 0 3000 4160" fill="none" xmlns="http://www.w3.org/2000/svg"><rect width="3000" height="4160" fill="white"/></svg>"#;

const MINIMAL_SVG: &str = r#"<svg width="6335" height="3208" viewBox="0 0 6335 3208" fill="none" xmlns="http://www.w3.org/2000/svg"><rect x="10" y="10" width="6315" height="3188" rx="390" fill="white" stroke="black" stroke-width="20"/><rect x="10" y="10" width="3121" height="3188" rx="390" fill="black" stroke="black" stroke-width="20"/></svg>"#;

#[cfg(test)]
#[path = "../../tests/unit/config/frames.rs"]
mod tests;
