use serde::{Deserialize, Serialize};

use crate::game::{CharacterType, Difficulty, LocationType};

/// A selectable race course, served by the backend as reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub location_type: LocationType,
    pub character_type: CharacterType,
    pub difficulty: Difficulty,
    pub background_theme: String,
    /// Score needed to unlock
    #[serde(default)]
    pub unlock_requirement: u64,
    #[serde(default = "unlocked")]
    pub is_unlocked: bool,
}

fn unlocked() -> bool {
    true
}

impl Track {
    /// The one track available when the backend cannot be reached
    pub fn fallback() -> Self {
        Self {
            id: "track_001".to_string(),
            name: "jamaica_country".to_string(),
            display_name: "Blue Mountain Trail".to_string(),
            location_type: LocationType::Country,
            character_type: CharacterType::OnFoot,
            difficulty: Difficulty::Easy,
            background_theme: "rural_mountains".to_string(),
            unlock_requirement: 0,
            is_unlocked: true,
        }
    }
}
