//! Export sessions.
//!
//! An [`ExportSession`](export_session::ExportSession) runs `render -> compose -> encode` for one
//! installed style and reports each invocation through an explicit state machine.

/// Session-oriented export API.
pub mod export_session;
/// Export state machine and reports.
pub mod state;
