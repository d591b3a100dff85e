//! Static user profile snapshot.

use serde::{Deserialize, Serialize};

/// Read-mostly user profile consumed by the intent classifier.
///
/// Treated as injected configuration: awarding points and level progression
/// happen outside the session engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Today's footprint in kg CO2.
    pub daily_carbon: f64,
    /// This week's footprint in kg CO2.
    pub weekly_carbon: f64,
    /// This month's footprint in kg CO2.
    pub monthly_carbon: f64,
    /// Yearly reduction goal in kg CO2.
    pub yearly_goal: f64,
    /// Cumulative carbon saved in kg CO2.
    pub saved_carbon: f64,
    /// Gamification level.
    pub level: u32,
    /// Accumulated points.
    pub points: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            daily_carbon: 12.5,
            weekly_carbon: 87.3,
            monthly_carbon: 345.2,
            yearly_goal: 3000.0,
            saved_carbon: 156.8,
            level: 7,
            points: 2450,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_values() {
        let profile = UserProfile::default();
        assert_eq!(profile.name, "User");
        assert_eq!(profile.daily_carbon, 12.5);
        assert_eq!(profile.level, 7);
        assert_eq!(profile.points, 2450);
    }

    #[test]
    fn profile_serde_roundtrip() {
        let profile = UserProfile::default();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }
}
