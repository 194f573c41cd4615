//! Character record model

use serde::{Deserialize, Serialize};

/// One World of Warcraft character as persisted in the `characters` table
///
/// `id` is assigned by Battle.net and never changes. Every other field is the
/// most recently observed state of the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub race: String,
    pub gender: String,
    pub character_class: String,
    pub faction: String,
    pub level: i64,
    /// None until the character has chosen a specialization
    pub active_spec: Option<String>,
    pub realm: String,
    pub guild: String,
    pub achievement_points: i64,
    pub equipped_item_level: i64,
    pub average_item_level: i64,
}

impl Character {
    /// `"<guild> - <realm>"`, the label used by the dashboard guild filter
    pub fn guild_label(&self) -> String {
        format!("{} - {}", self.guild, self.realm)
    }
}
