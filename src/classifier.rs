//! Rule-based intent classifier.
//!
//! Maps raw user text onto a canned response payload through an ordered rule
//! table: case-insensitive regex predicate → payload builder. Priority is
//! list position (first rule wins), not match position in the text. Unmatched
//! input falls back to a generic help prompt.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::UserProfile;

/// Transient classifier output; becomes a bot [`crate::messages::Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// Response text.
    pub content: String,
    /// Capability tags, in display order.
    pub tags: Vec<String>,
}

/// A single intent rule: predicate plus payload builder.
pub struct IntentRule {
    /// Short label for logging.
    pub name: &'static str,
    /// Case-insensitive predicate over the raw text.
    pub pattern: Regex,
    /// Capability tags attached to the response.
    pub tags: &'static [&'static str],
    /// Builds the response content, reading the profile where needed.
    pub respond: fn(&UserProfile) -> String,
}

impl IntentRule {
    fn payload(&self, profile: &UserProfile) -> ResponsePayload {
        ResponsePayload {
            content: (self.respond)(profile),
            tags: self.tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

/// Ordered rule table. New intents are added to the table; the dispatch loop
/// never changes.
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
    fallback: IntentRule,
}

impl IntentClassifier {
    /// Create a classifier with the default keyword rules.
    pub fn default_rules() -> Self {
        let rules = vec![
            IntentRule {
                name: "carbon-summary",
                pattern: Regex::new(r"(?i)carbon").unwrap(),
                tags: &["calculation", "tracking"],
                respond: |p| {
                    format!(
                        "Your daily carbon: {} kg CO2. Weekly: {}, Monthly: {}.",
                        p.daily_carbon, p.weekly_carbon, p.monthly_carbon
                    )
                },
            },
            IntentRule {
                name: "transport-advice",
                pattern: Regex::new(r"(?i)transport").unwrap(),
                tags: &["recommendation"],
                respond: |_| "Use public transport, biking, or carpooling to cut emissions!".to_string(),
            },
            IntentRule {
                name: "food-advice",
                pattern: Regex::new(r"(?i)food").unwrap(),
                tags: &["recommendation"],
                respond: |_| {
                    "🌿 Try plant-based meals like tofu or lentils for low carbon impact.".to_string()
                },
            },
        ];

        Self::with_rules(rules)
    }

    /// Create a classifier with a custom rule table. The fallback help rule
    /// is always appended.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self {
            rules,
            fallback: IntentRule {
                name: "general-help",
                pattern: Regex::new("").unwrap(),
                tags: &["general"],
                respond: |_| "Ask me about your carbon usage, transport, or food tips!".to_string(),
            },
        }
    }

    /// Classify raw text into a response payload. Deterministic given the
    /// same inputs; empty input is rejected upstream by the orchestrator.
    pub fn classify(&self, raw_text: &str, profile: &UserProfile) -> ResponsePayload {
        let rule = self
            .rules
            .iter()
            .find(|r| r.pattern.is_match(raw_text))
            .unwrap_or(&self.fallback);
        debug!(rule = rule.name, "Intent matched");
        rule.payload(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default_rules()
    }

    #[test]
    fn carbon_interpolates_profile_totals() {
        let profile = UserProfile::default();
        let payload = classifier().classify("what's my carbon footprint", &profile);
        assert!(payload.content.contains("12.5"));
        assert!(payload.content.contains("87.3"));
        assert!(payload.content.contains("345.2"));
        assert_eq!(payload.tags, vec!["calculation", "tracking"]);
    }

    #[test]
    fn transport_gives_static_advice() {
        let payload = classifier().classify("transport options", &UserProfile::default());
        assert!(payload.content.contains("public transport"));
        assert_eq!(payload.tags, vec!["recommendation"]);
    }

    #[test]
    fn food_gives_plant_based_advice() {
        let payload = classifier().classify("food options", &UserProfile::default());
        assert!(payload.content.contains("plant-based"));
        assert_eq!(payload.tags, vec!["recommendation"]);
    }

    #[test]
    fn unmatched_falls_back_to_help() {
        let payload = classifier().classify("tell me a joke", &UserProfile::default());
        assert!(payload.content.starts_with("Ask me about"));
        assert_eq!(payload.tags, vec!["general"]);
    }

    #[test]
    fn priority_is_rule_order_not_text_position() {
        // "transport" appears first in the text; the carbon rule still wins.
        let payload = classifier().classify("transport and carbon tips", &UserProfile::default());
        assert_eq!(payload.tags, vec!["calculation", "tracking"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let profile = UserProfile::default();
        let upper = classifier().classify("CARBON", &profile);
        let lower = classifier().classify("carbon", &profile);
        assert_eq!(upper, lower);
    }

    #[test]
    fn deterministic_for_same_input() {
        let profile = UserProfile::default();
        let a = classifier().classify("food", &profile);
        let b = classifier().classify("food", &profile);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_rule_table() {
        let rules = vec![IntentRule {
            name: "water",
            pattern: Regex::new(r"(?i)water").unwrap(),
            tags: &["recommendation"],
            respond: |_| "Take shorter showers.".to_string(),
        }];
        let classifier = IntentClassifier::with_rules(rules);

        let hit = classifier.classify("WATER usage", &UserProfile::default());
        assert_eq!(hit.content, "Take shorter showers.");

        // Default keywords fall through to help with a custom table.
        let miss = classifier.classify("carbon", &UserProfile::default());
        assert_eq!(miss.tags, vec!["general"]);
    }
}
