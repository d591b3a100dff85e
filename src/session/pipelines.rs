//! Pipeline backends — simulated stand-ins behind replaceable trait seams.
//!
//! Each simulated backend sleeps its configured delay and produces a canned
//! result. A real speech, vision, or response service implements the same
//! trait with an actual I/O call in place of the timer and maps its failures
//! to [`PipelineError`]; the session surfaces those as a bot message tagged
//! "error".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::classifier::{IntentClassifier, ResponsePayload};
use crate::config::SessionConfig;
use crate::error::PipelineError;
use crate::profile::UserProfile;
use crate::session::state::MediaHandle;

/// Source of transcribed phrases for the simulated transcriber.
pub trait PhraseSource: Send + Sync {
    fn next_phrase(&self) -> String;
}

/// Draws uniformly at random from a fixed phrase set.
pub struct RandomPhrases {
    phrases: Vec<String>,
}

impl RandomPhrases {
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }
}

impl PhraseSource for RandomPhrases {
    fn next_phrase(&self) -> String {
        self.phrases
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Always produces the same phrase. Used in tests for deterministic voice
/// resolution.
pub struct FixedPhrase(pub String);

impl PhraseSource for FixedPhrase {
    fn next_phrase(&self) -> String {
        self.0.clone()
    }
}

/// Voice capture + transcription seam.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Capture and transcribe one utterance.
    async fn transcribe(&self) -> Result<String, PipelineError>;
}

/// Media analysis seam.
#[async_trait]
pub trait MediaAnalyzer: Send + Sync {
    async fn analyze(&self, media: &MediaHandle) -> Result<ResponsePayload, PipelineError>;
}

/// Bot reply composition seam.
#[async_trait]
pub trait ReplyComposer: Send + Sync {
    async fn compose(&self, text: &str) -> Result<ResponsePayload, PipelineError>;
}

/// Simulated capture + transcription: fixed delay, then one phrase from the
/// sample set.
pub struct SimulatedTranscriber {
    delay: Duration,
    phrases: Arc<dyn PhraseSource>,
}

impl SimulatedTranscriber {
    pub fn new(delay: Duration, phrases: Arc<dyn PhraseSource>) -> Self {
        Self { delay, phrases }
    }
}

#[async_trait]
impl Transcriber for SimulatedTranscriber {
    async fn transcribe(&self) -> Result<String, PipelineError> {
        tokio::time::sleep(self.delay).await;
        let phrase = self.phrases.next_phrase();
        debug!(phrase = %phrase, "Simulated transcription complete");
        Ok(phrase)
    }
}

/// Simulated vision service: fixed delay, fixed advisory. The uploaded bytes
/// are never inspected.
pub struct SimulatedAnalyzer {
    delay: Duration,
}

impl SimulatedAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl MediaAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, media: &MediaHandle) -> Result<ResponsePayload, PipelineError> {
        tokio::time::sleep(self.delay).await;
        debug!(label = %media.label, "Simulated media analysis complete");
        Ok(ResponsePayload {
            content: "I see a product image. 🌱 Try using reusable packaging for sustainability!"
                .to_string(),
            tags: vec!["image-analysis".to_string(), "recommendation".to_string()],
        })
    }
}

/// Simulated "typing": fixed delay, then the rule-based classifier.
pub struct SimulatedComposer {
    delay: Duration,
    classifier: IntentClassifier,
    profile: UserProfile,
}

impl SimulatedComposer {
    pub fn new(delay: Duration, classifier: IntentClassifier, profile: UserProfile) -> Self {
        Self {
            delay,
            classifier,
            profile,
        }
    }
}

#[async_trait]
impl ReplyComposer for SimulatedComposer {
    async fn compose(&self, text: &str) -> Result<ResponsePayload, PipelineError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.classifier.classify(text, &self.profile))
    }
}

/// The full backend set wired into a session.
#[derive(Clone)]
pub struct Backends {
    pub transcriber: Arc<dyn Transcriber>,
    pub analyzer: Arc<dyn MediaAnalyzer>,
    pub composer: Arc<dyn ReplyComposer>,
}

impl Backends {
    /// Simulated stand-ins configured from the session config.
    pub fn simulated(config: &SessionConfig, profile: UserProfile) -> Self {
        Self {
            transcriber: Arc::new(SimulatedTranscriber::new(
                config.capture_delay,
                Arc::new(RandomPhrases::new(config.voice_phrases.clone())),
            )),
            analyzer: Arc::new(SimulatedAnalyzer::new(config.analysis_delay)),
            composer: Arc::new(SimulatedComposer::new(
                config.typing_delay,
                IntentClassifier::default_rules(),
                profile,
            )),
        }
    }
}

/// Handle to a single-shot running pipeline task.
///
/// Dropping the handle does not cancel the task; only `abort()` does (the
/// voice stop path). Image analysis and bot replies always run to completion.
#[derive(Debug)]
pub struct PipelineTask {
    handle: JoinHandle<()>,
}

impl PipelineTask {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_phrases_stay_in_sample_set() {
        let phrases = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let source = RandomPhrases::new(phrases.clone());
        for _ in 0..20 {
            assert!(phrases.contains(&source.next_phrase()));
        }
    }

    #[test]
    fn fixed_phrase_is_deterministic() {
        let source = FixedPhrase("always this".to_string());
        assert_eq!(source.next_phrase(), "always this");
        assert_eq!(source.next_phrase(), "always this");
    }

    #[tokio::test(start_paused = true)]
    async fn transcriber_waits_for_capture_delay() {
        let transcriber = SimulatedTranscriber::new(
            Duration::from_secs(3),
            Arc::new(FixedPhrase("hello".to_string())),
        );
        let start = tokio::time::Instant::now();
        let phrase = transcriber.transcribe().await.unwrap();
        assert_eq!(phrase, "hello");
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn analyzer_ignores_media_content() {
        let analyzer = SimulatedAnalyzer::new(Duration::from_secs(2));
        let a = analyzer.analyze(&MediaHandle::new("shoes.png")).await.unwrap();
        let b = analyzer.analyze(&MediaHandle::new("soup.jpg")).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tags, vec!["image-analysis", "recommendation"]);
    }

    #[tokio::test(start_paused = true)]
    async fn composer_runs_the_classifier() {
        let composer = SimulatedComposer::new(
            Duration::from_secs(1),
            IntentClassifier::default_rules(),
            UserProfile::default(),
        );
        let payload = composer.compose("transport options").await.unwrap();
        assert_eq!(payload.tags, vec!["recommendation"]);
    }
}
