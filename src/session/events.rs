//! Outbound notifications from the session to its host (the UI layer).

use crate::messages::Message;
use crate::session::state::{InputMode, MediaHandle};

/// Event emitted whenever observable session state changes.
///
/// Delivered through a broadcast channel; slow subscribers may lag and drop
/// events, the log itself is the source of truth.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A message was appended to the log.
    MessageAppended(Message),
    /// The bot "typing" indicator changed.
    ComposingChanged(bool),
    /// Voice capture started or stopped.
    ListeningChanged(bool),
    /// The active input mode changed.
    InputModeChanged(InputMode),
    /// Pending media was set (`Some`) or cleared (`None`).
    MediaPending(Option<MediaHandle>),
}

impl SessionEvent {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MessageAppended(_) => "message_appended",
            Self::ComposingChanged(_) => "composing_changed",
            Self::ListeningChanged(_) => "listening_changed",
            Self::InputModeChanged(_) => "input_mode_changed",
            Self::MediaPending(_) => "media_pending",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_labels() {
        assert_eq!(SessionEvent::ComposingChanged(true).label(), "composing_changed");
        assert_eq!(
            SessionEvent::InputModeChanged(InputMode::Voice).label(),
            "input_mode_changed"
        );
        assert_eq!(SessionEvent::MediaPending(None).label(), "media_pending");
    }
}
