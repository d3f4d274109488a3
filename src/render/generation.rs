use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Monotonic invocation counter shared by one export session.
#[derive(Clone, Debug, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Create a counter; the first invocation gets generation 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new invocation, making every earlier token stale.
    pub fn begin(&self) -> GenerationToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        GenerationToken {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Most recently issued generation (0 before the first invocation).
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Tag carried by one invocation.
#[derive(Clone, Debug)]
pub struct GenerationToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl GenerationToken {
    /// Generation number of this invocation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Return `true` while no newer invocation has started.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    /// Fail with [`QrFrameError::Superseded`] once a newer invocation has started.
    pub fn ensure_current(&self) -> QrFrameResult<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(QrFrameError::Superseded {
                generation: self.generation,
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/generation.rs"]
mod tests;
