/// Convenience result type used across qrframe.
pub type QrFrameResult<T> = Result<T, QrFrameError>;

/// Top-level error taxonomy for the render, compose and export pipeline.
#[derive(thiserror::Error, Debug)]
pub enum QrFrameError {
    /// An export was requested before a code style was installed.
    #[error("renderer unready: {0}")]
    RendererUnready(String),

    /// The styling engine produced neither a vector nor a raster root.
    #[error("unsupported render output: {0}")]
    UnsupportedRenderOutput(String),

    /// A raster drawing surface could not be allocated.
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// The requested frame identifier is absent from the catalog.
    #[error("frame not found: '{0}'")]
    FrameNotFound(String),

    /// SVG assembly, markup parsing or image encoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The logo could not be read or decoded.
    #[error("logo fetch failed: {0}")]
    LogoFetch(String),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The styling engine rejected its input (payload too long for the symbol version, etc.).
    #[error("engine error: {0}")]
    Engine(String),

    /// An artifact kind was handed to an encoder for the other kind.
    #[error("artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// A newer invocation started before this one completed.
    #[error("superseded: generation {generation} is stale")]
    Superseded {
        /// Generation of the discarded invocation.
        generation: u64,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Copyable discriminant of [`QrFrameError`], used by the export state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`QrFrameError::RendererUnready`].
    RendererUnready,
    /// See [`QrFrameError::UnsupportedRenderOutput`].
    UnsupportedRenderOutput,
    /// See [`QrFrameError::ContextUnavailable`].
    ContextUnavailable,
    /// See [`QrFrameError::FrameNotFound`].
    FrameNotFound,
    /// See [`QrFrameError::Serialization`].
    SerializationFailure,
    /// See [`QrFrameError::LogoFetch`].
    LogoFetchFailure,
    /// See [`QrFrameError::Validation`].
    Validation,
    /// See [`QrFrameError::Engine`].
    Engine,
    /// See [`QrFrameError::ArtifactMismatch`].
    ArtifactMismatch,
    /// See [`QrFrameError::Superseded`].
    Superseded,
    /// See [`QrFrameError::Other`].
    Other,
}

impl QrFrameError {
    /// Build a [`QrFrameError::RendererUnready`] value.
    pub fn renderer_unready(msg: impl Into<String>) -> Self {
        Self::RendererUnready(msg.into())
    }

    /// Build a [`QrFrameError::UnsupportedRenderOutput`] value.
    pub fn unsupported_output(msg: impl Into<String>) -> Self {
        Self::UnsupportedRenderOutput(msg.into())
    }

    /// Build a [`QrFrameError::ContextUnavailable`] value.
    pub fn context_unavailable(msg: impl Into<String>) -> Self {
        Self::ContextUnavailable(msg.into())
    }

    /// Build a [`QrFrameError::FrameNotFound`] value.
    pub fn frame_not_found(name: impl Into<String>) -> Self {
        Self::FrameNotFound(name.into())
    }

    /// Build a [`QrFrameError::Serialization`] value.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Build a [`QrFrameError::LogoFetch`] value.
    pub fn logo_fetch(msg: impl Into<String>) -> Self {
        Self::LogoFetch(msg.into())
    }

    /// Build a [`QrFrameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QrFrameError::Engine`] value.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Build a [`QrFrameError::ArtifactMismatch`] value.
    pub fn artifact_mismatch(msg: impl Into<String>) -> Self {
        Self::ArtifactMismatch(msg.into())
    }

    /// Return the copyable discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RendererUnready(_) => ErrorKind::RendererUnready,
            Self::UnsupportedRenderOutput(_) => ErrorKind::UnsupportedRenderOutput,
            Self::ContextUnavailable(_) => ErrorKind::ContextUnavailable,
            Self::FrameNotFound(_) => ErrorKind::FrameNotFound,
            Self::Serialization(_) => ErrorKind::SerializationFailure,
            Self::LogoFetch(_) => ErrorKind::LogoFetchFailure,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Engine(_) => ErrorKind::Engine,
            Self::ArtifactMismatch(_) => ErrorKind::ArtifactMismatch,
            Self::Superseded { .. } => ErrorKind::Superseded,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
