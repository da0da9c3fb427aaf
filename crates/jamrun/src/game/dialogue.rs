use serde::{Deserialize, Serialize};

use crate::game::DialogueContext;

/// A line of patois flavor text with its English translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub context: DialogueContext,
    pub dialogue: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
}

impl Dialogue {
    /// Canned line for a context, used when the backend cannot produce one
    pub fn fallback(context: DialogueContext) -> Self {
        let (dialogue, translation) = match context {
            DialogueContext::Start => (
                "Ready fi run through Jamaica, General?",
                "Ready to run through Jamaica, General?",
            ),
            DialogueContext::Victory => (
                "Big up yuhself! Yuh run like lightning!",
                "Congratulations! You ran like lightning!",
            ),
            DialogueContext::Defeat => (
                "Nuh worry, bredrin. Try again!",
                "Don't worry, friend. Try again!",
            ),
            DialogueContext::PowerUp => (
                "Bless up! Power boost time!",
                "Blessed up! Power boost time!",
            ),
        };

        Self {
            context,
            dialogue: dialogue.to_string(),
            translation: translation.to_string(),
            track_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_per_context() {
        let victory = Dialogue::fallback(DialogueContext::Victory);
        assert_eq!(victory.dialogue, "Big up yuhself! Yuh run like lightning!");
        assert_eq!(victory.context, DialogueContext::Victory);

        let defeat = Dialogue::fallback(DialogueContext::Defeat);
        assert_eq!(defeat.translation, "Don't worry, friend. Try again!");
    }

    #[test]
    fn test_deserialize_backend_dialogue() {
        let json = r#"{
            "id": "d1",
            "context": "start",
            "dialogue": "Mek wi go!",
            "translation": "Let's go!",
            "track_name": "jamaica_country",
            "created_at": "2025-01-05T10:00:00"
        }"#;

        let dialogue: Dialogue = serde_json::from_str(json).unwrap();
        assert_eq!(dialogue.context, DialogueContext::Start);
        assert_eq!(dialogue.dialogue, "Mek wi go!");
        assert_eq!(dialogue.track_name.as_deref(), Some("jamaica_country"));
    }
}
