//! Session configuration — tunable delays, phrase sets, quick actions.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session engine configuration.
///
/// Defaults mirror the production stand-in timings; tests shrink the delays.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulated voice capture + transcription delay.
    pub capture_delay: Duration,
    /// Simulated bot "typing" delay before a reply lands.
    pub typing_delay: Duration,
    /// Simulated media analysis delay.
    pub analysis_delay: Duration,
    /// Phrase sample set for the simulated transcriber.
    pub voice_phrases: Vec<String>,
    /// Greeting seeded into the log at session start.
    pub greeting: String,
    /// Quick action key → submitted phrase. Actions missing from the table
    /// fall back to their built-in default phrase.
    pub quick_action_phrases: Vec<(QuickAction, String)>,
    /// Capacity of the outbound event broadcast channel.
    pub event_capacity: usize,
}

impl SessionConfig {
    /// Phrase submitted when a quick action is invoked.
    pub fn quick_action_phrase(&self, action: QuickAction) -> &str {
        self.quick_action_phrases
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, phrase)| phrase.as_str())
            .unwrap_or_else(|| action.default_phrase())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capture_delay: Duration::from_millis(3000),
            typing_delay: Duration::from_millis(1500),
            analysis_delay: Duration::from_millis(2000),
            voice_phrases: vec![
                "How can I reduce my carbon footprint?".to_string(),
                "What's my carbon footprint for today?".to_string(),
                "Show me eco-friendly transport options".to_string(),
                "Set a goal to reduce carbon emissions".to_string(),
                "What are some sustainable food options?".to_string(),
            ],
            greeting: "Hello! I'm CarbonBot, your AI sustainability assistant. \
                       How would you like to reduce your carbon footprint today?"
                .to_string(),
            quick_action_phrases: QuickAction::all()
                .into_iter()
                .map(|a| (a, a.default_phrase().to_string()))
                .collect(),
            event_capacity: 64,
        }
    }
}

/// Pre-baked shortcuts into the text-submission path.
///
/// Each action submits a canned phrase through `submit_text`; there is no
/// separate code path for shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickAction {
    CalculateFootprint,
    SetGoal,
    TransportTips,
    FoodTips,
    JoinChallenge,
    Community,
}

impl QuickAction {
    /// All actions in display order.
    pub fn all() -> [QuickAction; 6] {
        [
            Self::CalculateFootprint,
            Self::SetGoal,
            Self::TransportTips,
            Self::FoodTips,
            Self::JoinChallenge,
            Self::Community,
        ]
    }

    /// Stable key used by hosting applications.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CalculateFootprint => "calculate-footprint",
            Self::SetGoal => "set-goal",
            Self::TransportTips => "transport-tips",
            Self::FoodTips => "food-tips",
            Self::JoinChallenge => "join-challenge",
            Self::Community => "community",
        }
    }

    /// Built-in default phrase; [`SessionConfig::quick_action_phrases`] may
    /// override it per key.
    pub fn default_phrase(&self) -> &'static str {
        match self {
            Self::CalculateFootprint => "carbon footprint",
            Self::SetGoal => "Set carbon goal",
            Self::TransportTips => "transport options",
            Self::FoodTips => "food options",
            Self::JoinChallenge => "challenges",
            Self::Community => "green community",
        }
    }
}

impl FromStr for QuickAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickAction::all()
            .into_iter()
            .find(|a| a.key() == s)
            .ok_or_else(|| format!("Unknown quick action: {s}"))
    }
}

impl std::fmt::Display for QuickAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delays() {
        let config = SessionConfig::default();
        assert_eq!(config.capture_delay, Duration::from_millis(3000));
        assert_eq!(config.typing_delay, Duration::from_millis(1500));
        assert_eq!(config.analysis_delay, Duration::from_millis(2000));
        assert_eq!(config.voice_phrases.len(), 5);
    }

    #[test]
    fn quick_action_keys_roundtrip() {
        for action in QuickAction::all() {
            let parsed: QuickAction = action.key().parse().unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn quick_action_unknown_key() {
        assert!("eat-more-kale".parse::<QuickAction>().is_err());
    }

    #[test]
    fn quick_action_serde_uses_kebab_case() {
        let json = serde_json::to_string(&QuickAction::TransportTips).unwrap();
        assert_eq!(json, "\"transport-tips\"");
    }

    #[test]
    fn transport_tips_phrase_hits_transport_rule() {
        assert!(QuickAction::TransportTips.default_phrase().contains("transport"));
    }

    #[test]
    fn quick_action_phrase_table_is_tunable() {
        let mut config = SessionConfig::default();
        assert_eq!(config.quick_action_phrase(QuickAction::FoodTips), "food options");

        config
            .quick_action_phrases
            .retain(|(a, _)| *a != QuickAction::FoodTips);
        config
            .quick_action_phrases
            .push((QuickAction::FoodTips, "vegetarian meal ideas".to_string()));
        assert_eq!(
            config.quick_action_phrase(QuickAction::FoodTips),
            "vegetarian meal ideas"
        );
    }

    #[test]
    fn missing_table_entries_fall_back_to_defaults() {
        let config = SessionConfig {
            quick_action_phrases: Vec::new(),
            ..Default::default()
        };
        for action in QuickAction::all() {
            assert_eq!(config.quick_action_phrase(action), action.default_phrase());
        }
    }
}
