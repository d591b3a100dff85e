//! Error types for the session engine.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Errors raised by the session orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Text submission with no content after trimming. Handled locally by
    /// dropping the submission; never surfaced as a message.
    #[error("Empty input submitted")]
    EmptyInput,

    /// Currently unreachable: every mode transition is permitted. Real
    /// capture/analysis backends may impose constraints.
    #[error("Invalid input mode transition: {from} -> {to}")]
    InvalidModeTransition { from: String, to: String },
}

/// Errors raised by pipeline backends.
///
/// The simulated backends never fail. A real transcription, vision, or
/// response service maps its I/O failures onto these kinds; the session
/// surfaces them as a bot message tagged "error" instead of dropping the
/// response silently.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("Response generation unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("Media analysis failed: {0}")]
    MediaAnalysisFailed(String),
}

/// Result type alias for the session engine.
pub type Result<T> = std::result::Result<T, Error>;
