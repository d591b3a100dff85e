//! Input mode and the mutable session state aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which input channel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Text,
    Voice,
    Image,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Voice => "voice",
            Self::Image => "image",
        };
        write!(f, "{s}")
    }
}

/// Opaque handle to an uploaded media item.
///
/// The session never inspects the underlying bytes; the handle only
/// identifies the item to the analysis backend and the hosting UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHandle {
    pub id: Uuid,
    /// Display label (typically the file name).
    pub label: String,
}

impl MediaHandle {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }
}

/// Mutable session aggregate.
///
/// Invariants hold by construction: entering listening forces voice mode and
/// recording pending media forces image mode. Explicitly switching away from
/// voice drops the listening flag; it never cancels a running capture task.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub input_mode: InputMode,
    pub is_listening: bool,
    /// Bot "typing" indicator — true while the reply pipeline is running.
    pub is_bot_composing: bool,
    /// Uploaded item awaiting analysis; cleared on resolution or discard.
    pub pending_media: Option<MediaHandle>,
    /// Whether spoken responses are enabled in the hosting UI.
    pub voice_output_enabled: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Text,
            is_listening: false,
            is_bot_composing: false,
            pending_media: None,
            voice_output_enabled: true,
        }
    }
}

impl SessionState {
    /// Explicit mode selection; never rejected.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        if mode != InputMode::Voice {
            self.is_listening = false;
        }
    }

    /// Begin listening; forces voice mode.
    pub fn start_listening(&mut self) {
        self.is_listening = true;
        self.input_mode = InputMode::Voice;
    }

    pub fn stop_listening(&mut self) {
        self.is_listening = false;
    }

    /// Record an uploaded item; forces image mode.
    pub fn set_pending_media(&mut self, media: MediaHandle) {
        self.pending_media = Some(media);
        self.input_mode = InputMode::Image;
    }

    /// Clear the pending item, returning it if one was set.
    pub fn clear_pending_media(&mut self) -> Option<MediaHandle> {
        self.pending_media.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listening_forces_voice_mode() {
        let mut state = SessionState::default();
        assert_eq!(state.input_mode, InputMode::Text);

        state.start_listening();
        assert!(state.is_listening);
        assert_eq!(state.input_mode, InputMode::Voice);
    }

    #[test]
    fn pending_media_forces_image_mode() {
        let mut state = SessionState::default();
        state.set_pending_media(MediaHandle::new("receipt.png"));
        assert_eq!(state.input_mode, InputMode::Image);
        assert!(state.pending_media.is_some());
    }

    #[test]
    fn switching_away_from_voice_drops_listening() {
        let mut state = SessionState::default();
        state.start_listening();

        state.set_mode(InputMode::Image);
        assert!(!state.is_listening);
        assert_eq!(state.input_mode, InputMode::Image);
    }

    #[test]
    fn mode_switch_is_never_rejected() {
        let mut state = SessionState::default();
        for mode in [InputMode::Voice, InputMode::Image, InputMode::Text] {
            state.set_mode(mode);
            assert_eq!(state.input_mode, mode);
        }
    }

    #[test]
    fn clear_pending_media_returns_handle() {
        let mut state = SessionState::default();
        let handle = MediaHandle::new("photo.jpg");
        state.set_pending_media(handle.clone());

        assert_eq!(state.clear_pending_media(), Some(handle));
        assert_eq!(state.clear_pending_media(), None);
    }

    #[test]
    fn input_mode_display_and_serde() {
        assert_eq!(InputMode::Voice.to_string(), "voice");
        let json = serde_json::to_string(&InputMode::Image).unwrap();
        assert_eq!(json, "\"image\"");
    }
}
