use qrcode::{Color, EcLevel, QrCode, Version};

use crate::config::style::ErrorCorrection;
use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Side length of a finder pattern, in modules.
pub const FINDER_SIZE: usize = 7;

/// Square grid of dark/light modules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleMatrix {
    count: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    /// Encode `data` into a symbol. `type_number == 0` picks the smallest version that fits.
    pub fn encode(data: &str, type_number: i16, ec: ErrorCorrection) -> QrFrameResult<Self> {
        let ec = match ec {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        };
        let code = if type_number == 0 {
            QrCode::with_error_correction_level(data.as_bytes(), ec)
        } else {
            QrCode::with_version(data.as_bytes(), Version::Normal(type_number), ec)
        }
        .map_err(|e| QrFrameError::engine(format!("encode payload: {e}")))?;

        let count = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self { count, dark })
    }

    /// Build a matrix from explicit rows (used by tests and custom engines).
    pub fn from_rows(rows: &[&[bool]]) -> QrFrameResult<Self> {
        let count = rows.len();
        if rows.iter().any(|r| r.len() != count) {
            return Err(QrFrameError::validation("module matrix must be square"));
        }
        Ok(Self {
            count,
            dark: rows.iter().flat_map(|r| r.iter().copied()).collect(),
        })
    }

    /// Modules per side.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Return `true` for a dark module; out-of-range coordinates are light.
    pub fn is_dark(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.count || col >= self.count {
            return false;
        }
        self.dark[row * self.count + col]
    }

    /// Return `true` when the module belongs to one of the three finder patterns.
    pub fn is_finder(&self, row: usize, col: usize) -> bool {
        let near = |v: usize| v < FINDER_SIZE;
        let far = |v: usize| v + FINDER_SIZE >= self.count;
        (near(row) && near(col)) || (near(row) && far(col)) || (far(row) && near(col))
    }

    /// Top-left module coordinates `(row, col)` of the three finder patterns.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.count.saturating_sub(FINDER_SIZE);
        [(0, 0), (0, far), (far, 0)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/matrix.rs"]
mod tests;
