use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context as _;

use crate::encode::exporter::ExportedFile;
use crate::foundation::error::QrFrameResult;

/// Receives finished exports.
///
/// A session only offers files from invocations that were still current when they finished.
pub trait SaveTarget: Send + Sync {
    /// Take ownership of a copy of `file` (write it out, hand it to a UI, ...).
    fn offer(&self, file: &ExportedFile) -> QrFrameResult<()>;
}

/// Writes exports into a directory, creating it on first use.
#[derive(Clone, Debug)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    /// Target writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `file` ends up once offered.
    pub fn path_for(&self, file: &ExportedFile) -> PathBuf {
        self.dir.join(&file.file_name)
    }
}

impl SaveTarget for DirectoryTarget {
    fn offer(&self, file: &ExportedFile) -> QrFrameResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.path_for(file);
        std::fs::write(&path, &file.bytes)
            .with_context(|| format!("write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "saved export");
        Ok(())
    }
}

/// In-memory target for tests and embedding. Clones share the same file list.
#[derive(Clone, Debug, Default)]
pub struct MemoryTarget {
    files: Arc<Mutex<Vec<ExportedFile>>>,
}

impl MemoryTarget {
    /// Create an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files offered so far, in order.
    pub fn files(&self) -> Vec<ExportedFile> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of files offered so far.
    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Return `true` when nothing was offered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SaveTarget for MemoryTarget {
    fn offer(&self, file: &ExportedFile) -> QrFrameResult<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(file.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
