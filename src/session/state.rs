use crate::encode::exporter::ExportedFile;
use crate::encode::format::ExportFormat;
use crate::foundation::error::ErrorKind;

/// Stage of one export invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportState {
    /// Not started.
    Idle,
    /// Waiting on the styling engine and bitmap normalization.
    Rendering,
    /// Merging the code with the frame.
    Compositing,
    /// Serializing the artifact.
    Encoding,
    /// File offered to the save target.
    Done,
    /// Aborted with the given error kind.
    Failed(ErrorKind),
    /// Discarded because a newer invocation started.
    Superseded,
}

impl ExportState {
    /// Return `true` for `Done`, `Failed` and `Superseded`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_) | Self::Superseded)
    }

    /// Return `true` when `self -> next` is a legal step.
    pub fn can_advance_to(self, next: Self) -> bool {
        use ExportState::*;
        match (self, next) {
            (s, _) if s.is_terminal() => false,
            (_, Failed(_) | Superseded) => true,
            (Idle, Rendering) | (Rendering, Compositing) | (Compositing, Encoding) => true,
            (Encoding, Done) => true,
            _ => false,
        }
    }
}

/// Ordered record of the states one invocation went through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTrace {
    states: Vec<ExportState>,
}

impl Default for ExportTrace {
    fn default() -> Self {
        Self {
            states: vec![ExportState::Idle],
        }
    }
}

impl ExportTrace {
    /// Trace starting at `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn current(&self) -> ExportState {
        self.states.last().copied().unwrap_or(ExportState::Idle)
    }

    /// Move to `next`; illegal steps are ignored and logged.
    pub fn advance(&mut self, next: ExportState) {
        let from = self.current();
        if !from.can_advance_to(next) {
            tracing::warn!(?from, ?next, "ignoring illegal export state transition");
            return;
        }
        tracing::debug!(?from, ?next, "export state");
        self.states.push(next);
    }

    /// States in order, starting with `Idle`.
    pub fn states(&self) -> &[ExportState] {
        &self.states
    }

    /// Consume into the state list.
    pub fn into_states(self) -> Vec<ExportState> {
        self.states
    }
}

/// How an invocation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The file was offered to the save target.
    Done(ExportedFile),
    /// The invocation failed; `notice` is the user-facing message.
    Failed {
        /// Error discriminant.
        kind: ErrorKind,
        /// Message to show the user.
        notice: String,
    },
    /// A newer invocation started; nothing was offered.
    Superseded,
}

/// Summary of one `export` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    /// Generation assigned when the call started; a request rejected before rendering reports
    /// the latest generation issued so far.
    pub generation: u64,
    /// Requested format.
    pub format: ExportFormat,
    /// States visited, `Idle` first and a terminal state last.
    pub trace: Vec<ExportState>,
    /// Final result.
    pub outcome: ExportOutcome,
}

impl ExportReport {
    /// Last state in the trace.
    pub fn final_state(&self) -> ExportState {
        self.trace.last().copied().unwrap_or(ExportState::Idle)
    }

    /// The offered file, if the call completed.
    pub fn file(&self) -> Option<&ExportedFile> {
        match &self.outcome {
            ExportOutcome::Done(file) => Some(file),
            _ => None,
        }
    }
}

/// User-facing message for a failed export.
pub fn failure_notice(format: ExportFormat) -> String {
    match format {
        ExportFormat::Svg => "Failed to generate SVG. Please try PNG or JPEG instead.".to_string(),
        other => format!("Failed to generate {}. Please try again.", other.label()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
