//! Session orchestrator — owns the log, the state aggregate, and the
//! pipeline wiring.
//!
//! All mutations funnel through a single mpsc command queue processed by one
//! actor task, so messages land in the log in resolution order and concurrent
//! pipeline completions never race. Handle methods are synchronous sends;
//! their effects surface asynchronously through the broadcast event stream.

pub mod events;
pub mod pipelines;
pub mod state;

pub use events::SessionEvent;
pub use state::{InputMode, MediaHandle, SessionState};

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use crate::classifier::ResponsePayload;
use crate::config::{QuickAction, SessionConfig};
use crate::error::PipelineError;
use crate::messages::{Message, MessageLog};
use crate::profile::UserProfile;
use pipelines::{Backends, PipelineTask};

/// Tags on the greeting seeded at session start.
const GREETING_TAGS: [&str; 4] = ["voice", "text", "calculation", "recommendation"];

/// Commands accepted by the session actor.
#[derive(Debug)]
enum Command {
    SubmitText(String),
    StartVoiceCapture,
    StopVoiceCapture,
    UploadMedia(MediaHandle),
    DiscardMedia,
    InvokeQuickAction(QuickAction),
    SetInputMode(InputMode),
    ToggleVoiceOutput(bool),
    VoiceResolved {
        r#gen: u64,
        result: Result<String, PipelineError>,
    },
    AnalysisResolved(Result<ResponsePayload, PipelineError>),
    ReplyResolved(Result<ResponsePayload, PipelineError>),
    Messages(oneshot::Sender<Vec<Message>>),
    State(oneshot::Sender<SessionState>),
}

/// Cloneable handle to a running session.
///
/// Command methods never block and never fail from the caller's perspective;
/// once the actor is gone the command is dropped with a warning.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Submit typed text. Trimmed-empty input is silently ignored.
    pub fn submit_text(&self, text: impl Into<String>) {
        self.send(Command::SubmitText(text.into()));
    }

    /// Start the voice capture pipeline. No-op if already capturing.
    pub fn start_voice_capture(&self) {
        self.send(Command::StartVoiceCapture);
    }

    /// Cancel a running voice capture before it resolves.
    pub fn stop_voice_capture(&self) {
        self.send(Command::StopVoiceCapture);
    }

    /// Upload a media item and start the analysis pipeline.
    pub fn upload_media(&self, media: MediaHandle) {
        self.send(Command::UploadMedia(media));
    }

    /// Discard pending media without analysis. Valid only before the
    /// analysis resolves.
    pub fn discard_media(&self) {
        self.send(Command::DiscardMedia);
    }

    /// Submit a quick action's canned phrase through the text path.
    pub fn invoke_quick_action(&self, action: QuickAction) {
        self.send(Command::InvokeQuickAction(action));
    }

    /// Explicitly select the input mode. Never rejected.
    pub fn set_input_mode(&self, mode: InputMode) {
        self.send(Command::SetInputMode(mode));
    }

    /// Enable or disable spoken responses in the hosting UI.
    pub fn toggle_voice_output(&self, enabled: bool) {
        self.send(Command::ToggleVoiceOutput(enabled));
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Session events as a stream.
    pub fn event_stream(&self) -> BroadcastStream<SessionEvent> {
        BroadcastStream::new(self.subscribe())
    }

    /// Snapshot of the message log, oldest first.
    pub async fn messages(&self) -> Vec<Message> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Messages(tx));
        rx.await.unwrap_or_default()
    }

    /// Snapshot of the session state.
    pub async fn state(&self) -> SessionState {
        let (tx, rx) = oneshot::channel();
        self.send(Command::State(tx));
        rx.await.unwrap_or_default()
    }

    fn send(&self, cmd: Command) {
        if self.tx.send(cmd).is_err() {
            warn!("Session actor is gone; command dropped");
        }
    }
}

/// The session actor. Create via [`Session::spawn`] or
/// [`Session::spawn_with`].
pub struct Session {
    config: SessionConfig,
    backends: Backends,
    log: MessageLog,
    state: SessionState,
    events: broadcast::Sender<SessionEvent>,
    /// Sender cloned into pipeline tasks so completions re-enter the queue.
    tx: mpsc::UnboundedSender<Command>,
    voice: Option<PipelineTask>,
    /// Bumped on every capture start; a resolution is honored only if it
    /// carries the current generation and the slot is still occupied.
    voice_gen: u64,
    analysis: Option<PipelineTask>,
    reply_running: bool,
    /// Submissions awaiting a reply pipeline slot, FIFO. Every accepted
    /// submission gets exactly one bot reply.
    reply_queue: VecDeque<String>,
}

impl Session {
    /// Spawn a session with the simulated pipeline backends.
    pub fn spawn(config: SessionConfig, profile: UserProfile) -> SessionHandle {
        let backends = Backends::simulated(&config, profile);
        Self::spawn_with(config, backends)
    }

    /// Spawn a session with custom backends (tests, real services).
    pub fn spawn_with(config: SessionConfig, backends: Backends) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity);

        let greeting = config.greeting.clone();
        let mut session = Session {
            config,
            backends,
            log: MessageLog::new(),
            state: SessionState::default(),
            events: events.clone(),
            tx: tx.clone(),
            voice: None,
            voice_gen: 0,
            analysis: None,
            reply_running: false,
            reply_queue: VecDeque::new(),
        };
        session.append(Message::bot(
            greeting,
            GREETING_TAGS.iter().map(|t| (*t).to_string()).collect(),
        ));

        tokio::spawn(session.run(rx));
        info!("Session started");

        SessionHandle { tx, events }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(cmd) = rx.recv().await {
            self.handle(cmd);
        }
        debug!("Session actor stopped");
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::SubmitText(text) => self.submit_text(text),
            Command::StartVoiceCapture => self.start_voice(),
            Command::StopVoiceCapture => self.stop_voice(),
            Command::UploadMedia(media) => self.upload_media(media),
            Command::DiscardMedia => self.discard_media(),
            Command::InvokeQuickAction(action) => {
                debug!(action = %action, "Quick action invoked");
                let phrase = self.config.quick_action_phrase(action).to_string();
                self.submit_text(phrase);
            }
            Command::SetInputMode(mode) => self.set_input_mode(mode),
            Command::ToggleVoiceOutput(enabled) => {
                self.state.voice_output_enabled = enabled;
                debug!(enabled, "Voice output toggled");
            }
            Command::VoiceResolved { r#gen, result } => self.voice_resolved(r#gen, result),
            Command::AnalysisResolved(result) => self.analysis_resolved(result),
            Command::ReplyResolved(result) => self.reply_resolved(result),
            Command::Messages(tx) => {
                let _ = tx.send(self.log.all().to_vec());
            }
            Command::State(tx) => {
                let _ = tx.send(self.state.clone());
            }
        }
    }

    // ── Text submission + bot reply ─────────────────────────────────

    fn submit_text(&mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            // SessionError::EmptyInput, handled locally per the error design.
            debug!("Ignoring empty submission");
            return;
        }
        self.append(Message::user(&text));
        self.reply_queue.push_back(text);
        self.maybe_start_reply();
    }

    fn maybe_start_reply(&mut self) {
        if self.reply_running {
            return;
        }
        let Some(text) = self.reply_queue.pop_front() else {
            self.set_composing(false);
            return;
        };

        self.reply_running = true;
        self.set_composing(true);
        let composer = Arc::clone(&self.backends.composer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = composer.compose(&text).await;
            let _ = tx.send(Command::ReplyResolved(result));
        });
        debug!("Bot reply pipeline started");
    }

    fn reply_resolved(&mut self, result: Result<ResponsePayload, PipelineError>) {
        self.reply_running = false;
        match result {
            Ok(payload) => self.append(Message::bot(payload.content, payload.tags)),
            Err(e) => {
                warn!(error = %e, "Reply pipeline failed");
                self.append(Message::bot(e.to_string(), vec!["error".to_string()]));
            }
        }
        self.maybe_start_reply();
    }

    // ── Voice capture ───────────────────────────────────────────────

    fn start_voice(&mut self) {
        if self.voice.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("Voice capture already running; ignoring start");
            return;
        }

        let prev_mode = self.state.input_mode;
        let prev_listening = self.state.is_listening;
        self.state.start_listening();
        self.emit_mode_change(prev_mode);
        self.emit_listening_change(prev_listening);

        self.voice_gen = self.voice_gen.wrapping_add(1);
        let r#gen = self.voice_gen;
        let transcriber = Arc::clone(&self.backends.transcriber);
        let tx = self.tx.clone();
        self.voice = Some(PipelineTask::new(tokio::spawn(async move {
            let result = transcriber.transcribe().await;
            let _ = tx.send(Command::VoiceResolved { r#gen, result });
        })));
        info!(r#gen, "Voice capture started");
    }

    fn stop_voice(&mut self) {
        let Some(task) = self.voice.take() else {
            debug!("No voice capture running; ignoring stop");
            return;
        };
        task.abort();

        let prev = self.state.is_listening;
        self.state.stop_listening();
        self.emit_listening_change(prev);
        info!("Voice capture cancelled");
    }

    fn voice_resolved(&mut self, r#gen: u64, result: Result<String, PipelineError>) {
        // A stop (or stop + restart) may already be queued ahead of this
        // resolution; only the current generation with a live slot counts.
        if r#gen != self.voice_gen || self.voice.is_none() {
            debug!(r#gen, "Stale voice resolution; ignoring");
            return;
        }
        self.voice = None;

        let prev = self.state.is_listening;
        self.state.stop_listening();
        self.emit_listening_change(prev);

        match result {
            Ok(phrase) => {
                info!(phrase = %phrase, "Voice capture resolved");
                // Feed the phrase into the text path exactly as if typed.
                self.submit_text(phrase);
            }
            Err(e) => {
                warn!(error = %e, "Voice pipeline failed");
                self.append(Message::bot(e.to_string(), vec!["error".to_string()]));
            }
        }
    }

    // ── Media upload + analysis ─────────────────────────────────────

    fn upload_media(&mut self, media: MediaHandle) {
        if self.analysis.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("Media analysis already running; ignoring upload");
            return;
        }

        let label = media.label.clone();
        let prev_mode = self.state.input_mode;
        self.state.set_pending_media(media.clone());
        self.emit_mode_change(prev_mode);
        self.emit(SessionEvent::MediaPending(Some(media.clone())));

        let analyzer = Arc::clone(&self.backends.analyzer);
        let tx = self.tx.clone();
        self.analysis = Some(PipelineTask::new(tokio::spawn(async move {
            let result = analyzer.analyze(&media).await;
            let _ = tx.send(Command::AnalysisResolved(result));
        })));
        info!(label = %label, "Media analysis started");
    }

    fn discard_media(&mut self) {
        if self.state.clear_pending_media().is_some() {
            self.emit(SessionEvent::MediaPending(None));
            info!("Pending media discarded");
        } else {
            debug!("No pending media to discard");
        }
    }

    fn analysis_resolved(&mut self, result: Result<ResponsePayload, PipelineError>) {
        self.analysis = None;
        if self.state.pending_media.is_none() {
            debug!("Media discarded before analysis resolved; dropping result");
            return;
        }

        self.state.clear_pending_media();
        self.emit(SessionEvent::MediaPending(None));

        match result {
            Ok(payload) => self.append(Message::bot(payload.content, payload.tags)),
            Err(e) => {
                warn!(error = %e, "Media analysis failed");
                self.append(Message::bot(e.to_string(), vec!["error".to_string()]));
            }
        }
    }

    // ── Mode + state bookkeeping ────────────────────────────────────

    fn set_input_mode(&mut self, mode: InputMode) {
        let prev_mode = self.state.input_mode;
        let prev_listening = self.state.is_listening;
        // Switching away from voice drops the listening flag but leaves any
        // running capture task alone; its phrase still lands on resolution.
        self.state.set_mode(mode);
        self.emit_mode_change(prev_mode);
        self.emit_listening_change(prev_listening);
    }

    fn set_composing(&mut self, composing: bool) {
        if self.state.is_bot_composing != composing {
            self.state.is_bot_composing = composing;
            self.emit(SessionEvent::ComposingChanged(composing));
        }
    }

    fn emit_mode_change(&self, prev: InputMode) {
        if prev != self.state.input_mode {
            self.emit(SessionEvent::InputModeChanged(self.state.input_mode));
        }
    }

    fn emit_listening_change(&self, prev: bool) {
        if prev != self.state.is_listening {
            self.emit(SessionEvent::ListeningChanged(self.state.is_listening));
        }
    }

    fn append(&mut self, message: Message) {
        debug!(origin = ?message.origin, tags = ?message.capability_tags, "Appending message");
        self.emit(SessionEvent::MessageAppended(message.clone()));
        self.log.append(message);
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; the log holds the state of record.
        let _ = self.events.send(event);
    }
}
