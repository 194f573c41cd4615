//! Character database operations
//!
//! The `characters` table is keyed by the Battle.net character id. Re-importing
//! a character refreshes only the columns named by the [`UpsertPolicy`]; by
//! default that is `character_class` alone, every other column keeps the value
//! from the first import.

use crate::models::Character;
use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

/// Mutable `characters` columns that an upsert may refresh
///
/// `id` is deliberately absent: it is the conflict key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshColumn {
    Name,
    Race,
    Gender,
    CharacterClass,
    Faction,
    Level,
    ActiveSpec,
    Realm,
    Guild,
    AchievementPoints,
    EquippedItemLevel,
    AverageItemLevel,
}

impl RefreshColumn {
    /// Column name in the `characters` table
    pub fn column_name(self) -> &'static str {
        match self {
            RefreshColumn::Name => "name",
            RefreshColumn::Race => "race",
            RefreshColumn::Gender => "gender",
            RefreshColumn::CharacterClass => "character_class",
            RefreshColumn::Faction => "faction",
            RefreshColumn::Level => "level",
            RefreshColumn::ActiveSpec => "active_spec",
            RefreshColumn::Realm => "realm",
            RefreshColumn::Guild => "guild",
            RefreshColumn::AchievementPoints => "achievement_points",
            RefreshColumn::EquippedItemLevel => "equipped_item_level",
            RefreshColumn::AverageItemLevel => "average_item_level",
        }
    }
}

/// Which columns are refreshed when an incoming record collides on `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertPolicy {
    pub refresh: Vec<RefreshColumn>,
}

impl Default for UpsertPolicy {
    fn default() -> Self {
        Self {
            refresh: vec![RefreshColumn::CharacterClass],
        }
    }
}

impl UpsertPolicy {
    pub fn new(refresh: Vec<RefreshColumn>) -> Self {
        Self { refresh }
    }

    /// Never refresh an existing row
    pub fn insert_only() -> Self {
        Self { refresh: Vec::new() }
    }

    /// `ON CONFLICT` action for this policy
    fn conflict_action(&self) -> String {
        let mut columns: Vec<&'static str> = Vec::new();
        for column in &self.refresh {
            let name = column.column_name();
            if !columns.contains(&name) {
                columns.push(name);
            }
        }

        if columns.is_empty() {
            return "DO NOTHING".to_string();
        }

        let assignments: Vec<String> = columns
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect();
        format!("DO UPDATE SET {}", assignments.join(", "))
    }
}

/// Create the `characters` table if it does not exist
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS characters (
            id INTEGER PRIMARY KEY,
            name TEXT,
            race TEXT,
            gender TEXT,
            character_class TEXT,
            faction TEXT,
            level INTEGER,
            active_spec TEXT,
            realm TEXT,
            guild TEXT,
            achievement_points INTEGER,
            equipped_item_level INTEGER,
            average_item_level INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("Database tables initialized (characters)");

    Ok(())
}

/// Insert a character, or refresh the policy's columns if its id exists
pub async fn upsert_character(
    conn: &mut SqliteConnection,
    character: &Character,
    policy: &UpsertPolicy,
) -> Result<()> {
    let sql = format!(
        r#"
        INSERT INTO characters (
            id, name, race, gender, character_class, faction, level,
            active_spec, realm, guild, achievement_points,
            equipped_item_level, average_item_level
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) {}
        "#,
        policy.conflict_action()
    );

    sqlx::query(&sql)
        .bind(character.id)
        .bind(&character.name)
        .bind(&character.race)
        .bind(&character.gender)
        .bind(&character.character_class)
        .bind(&character.faction)
        .bind(character.level)
        .bind(&character.active_spec)
        .bind(&character.realm)
        .bind(&character.guild)
        .bind(character.achievement_points)
        .bind(character.equipped_item_level)
        .bind(character.average_item_level)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Upsert a batch of characters in one transaction
///
/// Returns the number of records written. Nothing is committed if any
/// statement fails.
pub async fn upsert_characters(
    pool: &SqlitePool,
    characters: &[Character],
    policy: &UpsertPolicy,
) -> Result<usize> {
    let mut tx = pool.begin().await?;

    for character in characters {
        upsert_character(&mut tx, character, policy).await?;
    }

    tx.commit().await?;

    tracing::debug!(count = characters.len(), "Committed character batch");

    Ok(characters.len())
}

/// Load every stored character, ordered by id
pub async fn load_all_characters(pool: &SqlitePool) -> Result<Vec<Character>> {
    let characters = sqlx::query_as::<_, Character>(
        r#"
        SELECT id, name, race, gender, character_class, faction, level,
               active_spec, realm, guild, achievement_points,
               equipped_item_level, average_item_level
        FROM characters
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(characters)
}

/// Number of stored characters
pub async fn count_characters(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
