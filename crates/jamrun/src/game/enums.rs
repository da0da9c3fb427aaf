use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Phase of the game. Exactly one is active at any time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, IntoStaticStr, Display,
)]
pub enum Mode {
    #[default]
    Menu,
    Playing,
    Paused,
    #[strum(serialize = "Game Over")]
    GameOver,
}

impl Mode {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DialogueContext {
    Start,
    Victory,
    Defeat,
    #[strum(serialize = "powerup")]
    #[serde(rename = "powerup")]
    PowerUp,
}

impl DialogueContext {
    /// Outcome dialogue for a finished race
    pub fn for_result(score: u64, victory_score: u64) -> Self {
        if score > victory_score {
            Self::Victory
        } else {
            Self::Defeat
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn short_name(&self) -> &'static str {
        self.into()
    }

    /// Get the color code for difficulty (for terminal output)
    pub fn color_code(&self) -> &'static str {
        match self {
            Self::Easy => "#32CD32",
            Self::Medium => "#F4903C",
            Self::Hard => "#E52B19",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocationType {
    #[default]
    Country,
    City,
    Town,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CharacterType {
    #[default]
    OnFoot,
    Vehicle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Menu.to_string(), "Menu");
        assert_eq!(Mode::GameOver.to_string(), "Game Over");
        assert_eq!(Mode::default(), Mode::Menu);
    }

    #[test]
    fn test_mode_is_playing() {
        assert!(Mode::Playing.is_playing());
        assert!(!Mode::Paused.is_playing());
        assert!(!Mode::GameOver.is_playing());
    }

    #[test]
    fn test_dialogue_context_wire_names() {
        assert_eq!(
            serde_json::to_string(&DialogueContext::PowerUp).unwrap(),
            "\"powerup\""
        );
        assert_eq!(
            DialogueContext::from_str("victory").unwrap(),
            DialogueContext::Victory
        );
        assert_eq!(DialogueContext::PowerUp.to_string(), "powerup");
        assert!(DialogueContext::from_str("taunt").is_err());
    }

    #[test]
    fn test_dialogue_context_for_result() {
        assert_eq!(
            DialogueContext::for_result(501, 500),
            DialogueContext::Victory
        );
        assert_eq!(DialogueContext::for_result(500, 500), DialogueContext::Defeat);
        assert_eq!(DialogueContext::for_result(0, 500), DialogueContext::Defeat);
    }

    #[test]
    fn test_track_enums_snake_case() {
        assert_eq!(
            serde_json::from_str::<CharacterType>("\"on_foot\"").unwrap(),
            CharacterType::OnFoot
        );
        assert_eq!(CharacterType::Vehicle.to_string(), "vehicle");
        assert_eq!(
            serde_json::from_str::<LocationType>("\"city\"").unwrap(),
            LocationType::City
        );
        assert_eq!(Difficulty::Medium.short_name(), "medium");
    }
}
