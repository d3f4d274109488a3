use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context as _;

use crate::assets::logo::LogoImage;
use crate::compose::compositor::compose;
use crate::config::brand::BrandSettings;
use crate::config::frames::FrameRecord;
use crate::config::style::CodeStyleConfig;
use crate::encode::exporter::{ExportedFile, export_file, unix_millis};
use crate::encode::format::ExportFormat;
use crate::encode::sink::SaveTarget;
use crate::engine::StylingEngine;
use crate::foundation::error::{QrFrameError, QrFrameResult};
use crate::render::generation::{GenerationCounter, GenerationToken};
use crate::render::renderer::CodeRenderer;
use crate::session::state::{
    ExportOutcome, ExportReport, ExportState, ExportTrace, failure_notice,
};

/// Long-lived export front end: one installed style, many export calls.
///
/// Every [`ExportSession::export`] call takes a new generation. A call that finishes after a newer
/// one has started is reported as `Superseded` and its file is never offered to the save target.
pub struct ExportSession<E> {
    renderer: CodeRenderer<E>,
    settings: BrandSettings,
    style: Mutex<Option<Arc<CodeStyleConfig>>>,
    generations: GenerationCounter,
    target: Box<dyn SaveTarget>,
    offer_lock: Mutex<()>,
}

impl<E: StylingEngine> ExportSession<E> {
    /// Build a session; `settings` are validated first.
    pub fn new(
        engine: E,
        settings: BrandSettings,
        target: impl SaveTarget + 'static,
    ) -> QrFrameResult<Self> {
        Self::with_renderer(CodeRenderer::new(engine), settings, Box::new(target))
    }

    /// Build a session around an existing renderer.
    pub fn with_renderer(
        renderer: CodeRenderer<E>,
        settings: BrandSettings,
        target: Box<dyn SaveTarget>,
    ) -> QrFrameResult<Self> {
        settings.validate()?;
        Ok(Self {
            renderer,
            settings,
            style: Mutex::new(None),
            generations: GenerationCounter::new(),
            target,
            offer_lock: Mutex::new(()),
        })
    }

    /// Brand settings this session was built with.
    pub fn settings(&self) -> &BrandSettings {
        &self.settings
    }

    /// Renderer used for every export.
    pub fn renderer(&self) -> &CodeRenderer<E> {
        &self.renderer
    }

    /// Most recently issued generation.
    pub fn latest_generation(&self) -> u64 {
        self.generations.latest()
    }

    /// The brand's base style with `data` and `logo` applied.
    pub fn style_for(&self, data: &str, logo: Option<Arc<LogoImage>>) -> CodeStyleConfig {
        self.settings.qr_options.with_data(data).with_logo(logo)
    }

    /// Install the style used by subsequent exports.
    pub fn set_style(&self, style: CodeStyleConfig) {
        *self.style.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(style));
    }

    /// Currently installed style.
    pub fn style(&self) -> Option<Arc<CodeStyleConfig>> {
        self.style
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Render, compose and encode the installed style into `frame_id` as `format`.
    ///
    /// Never returns an error: failures are reported through [`ExportOutcome::Failed`] with a
    /// user-facing notice, and only affect this call. A request rejected up front (unknown frame,
    /// no style) takes no generation, so it cannot supersede an export already in flight.
    #[tracing::instrument(skip(self), fields(generation = tracing::field::Empty))]
    pub async fn export(&self, frame_id: &str, format: ExportFormat) -> ExportReport {
        let mut trace = ExportTrace::new();
        let (frame, style) = match self.admit(frame_id) {
            Ok(admitted) => admitted,
            Err(err) => {
                let outcome = self.settle_error(err, format, &mut trace);
                return ExportReport {
                    generation: self.generations.latest(),
                    format,
                    trace: trace.into_states(),
                    outcome,
                };
            }
        };

        let token = self.generations.begin();
        tracing::Span::current().record("generation", token.generation());

        let outcome = match self.run(&token, frame, style, format, &mut trace).await {
            Ok(file) => self.deliver(&token, file, format, &mut trace),
            Err(err) => self.settle_error(err, format, &mut trace),
        };

        ExportReport {
            generation: token.generation(),
            format,
            trace: trace.into_states(),
            outcome,
        }
    }

    fn admit(&self, frame_id: &str) -> QrFrameResult<(FrameRecord, Arc<CodeStyleConfig>)> {
        let frame = self.settings.frames.get(frame_id)?.clone();
        let style = self
            .style()
            .ok_or_else(|| QrFrameError::renderer_unready("no code style installed"))?;
        Ok((frame, style))
    }

    async fn run(
        &self,
        token: &GenerationToken,
        frame: FrameRecord,
        style: Arc<CodeStyleConfig>,
        format: ExportFormat,
        trace: &mut ExportTrace,
    ) -> QrFrameResult<ExportedFile> {
        trace.advance(ExportState::Rendering);
        let bitmap = self
            .renderer
            .render_current(&style, frame.position.size, token)
            .await?;

        trace.advance(ExportState::Compositing);
        let kind = format.output_kind();
        let artifact = tokio::task::spawn_blocking(move || compose(&frame, bitmap, kind))
            .await
            .context("join compose task")??;
        token.ensure_current()?;

        trace.advance(ExportState::Encoding);
        let unix_ms = unix_millis();
        let file = tokio::task::spawn_blocking(move || export_file(&artifact, format, unix_ms))
            .await
            .context("join encode task")??;
        token.ensure_current()?;
        Ok(file)
    }

    fn deliver(
        &self,
        token: &GenerationToken,
        file: ExportedFile,
        format: ExportFormat,
        trace: &mut ExportTrace,
    ) -> ExportOutcome {
        // The currency check and the offer must not interleave with another call's offer.
        let _guard = self.offer_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !token.is_current() {
            return self.settle_error(
                QrFrameError::Superseded {
                    generation: token.generation(),
                },
                format,
                trace,
            );
        }
        if let Err(err) = self.target.offer(&file) {
            return self.settle_error(err, format, trace);
        }
        trace.advance(ExportState::Done);
        tracing::info!(file = %file.file_name, bytes = file.bytes.len(), "export done");
        ExportOutcome::Done(file)
    }

    fn settle_error(
        &self,
        err: QrFrameError,
        format: ExportFormat,
        trace: &mut ExportTrace,
    ) -> ExportOutcome {
        if let QrFrameError::Superseded { generation } = err {
            tracing::debug!(generation, "discarding stale export");
            trace.advance(ExportState::Superseded);
            return ExportOutcome::Superseded;
        }
        let kind = err.kind();
        tracing::error!(%format, ?kind, error = %err, "export failed");
        trace.advance(ExportState::Failed(kind));
        ExportOutcome::Failed {
            kind,
            notice: failure_notice(format),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/export_session.rs"]
mod tests;
