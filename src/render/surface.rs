use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::engine::RenderedElement;

#[derive(Debug, Default)]
struct RegistryInner {
    live: AtomicUsize,
    acquired: AtomicU64,
}

/// Hands out off-screen render surfaces and tracks how many are alive.
///
/// Each surface is owned by exactly one render call and is released when dropped, so the live
/// count returns to zero once every call has finished, whatever path it finished on.
#[derive(Clone, Debug, Default)]
pub struct SurfaceRegistry {
    inner: Arc<RegistryInner>,
}

impl SurfaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a fresh, empty surface of the given size.
    pub fn acquire(&self, width: u32, height: u32) -> RenderSurface {
        let id = self.inner.acquired.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.live.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(surface = id, width, height, "acquired render surface");
        RenderSurface {
            id,
            width,
            height,
            children: Vec::new(),
            registry: Arc::clone(&self.inner),
        }
    }

    /// Number of surfaces currently alive.
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::Acquire)
    }

    /// Number of surfaces ever acquired.
    pub fn acquired_total(&self) -> u64 {
        self.inner.acquired.load(Ordering::Relaxed)
    }
}

/// Detached container the styling engine mounts its output into.
pub struct RenderSurface {
    id: u64,
    width: u32,
    height: u32,
    children: Vec<RenderedElement>,
    registry: Arc<RegistryInner>,
}

impl RenderSurface {
    /// Registry-unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Requested width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Requested height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Append an element.
    pub fn mount(&mut self, element: RenderedElement) {
        self.children.push(element);
    }

    /// Borrow the first mounted element.
    pub fn first_element(&self) -> Option<&RenderedElement> {
        self.children.first()
    }

    /// Detach and return the first mounted element.
    pub fn take_first(&mut self) -> Option<RenderedElement> {
        if self.children.is_empty() {
            return None;
        }
        Some(self.children.remove(0))
    }

    /// Number of mounted elements.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Return `true` when nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("children", &self.children)
            .finish()
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        self.children.clear();
        self.registry.live.fetch_sub(1, Ordering::AcqRel);
        tracing::debug!(surface = self.id, "released render surface");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
