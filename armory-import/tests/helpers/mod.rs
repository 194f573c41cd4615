//! Test Helper Utilities
//!
//! Shared fixtures for armory-import integration tests

#![allow(dead_code)]

use armory_common::db::init_database_pool;
use armory_common::slug::slugify;
use armory_import::client::{ApiError, GuildRoster, ProfileSource, RosterCharacter, RosterMember};
use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Localized name map as returned by the profile endpoint
pub fn localized(en: &str) -> Value {
    json!({ "name": { "en_US": en, "fr_FR": en } })
}

/// Character profile document
pub fn profile_document(id: i64, name: &str, class: &str, spec: Option<&str>) -> Value {
    let mut doc = json!({
        "id": id,
        "name": name,
        "race": localized("Human"),
        "gender": localized("Female"),
        "character_class": localized(class),
        "faction": localized("Alliance"),
        "level": 70,
        "realm": localized("Area 52"),
        "guild": { "name": "Kirin Tor" },
        "achievement_points": 1000 + id,
        "equipped_item_level": 470,
        "average_item_level": 472
    });
    if let Some(spec) = spec {
        doc["active_spec"] = localized(spec);
    }
    doc
}

/// Roster document with the given member names
pub fn roster_document(names: &[&str]) -> Value {
    let members: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(rank, name)| json!({ "character": { "name": name }, "rank": rank }))
        .collect();
    json!({ "guild": { "name": "Kirin Tor" }, "members": members })
}

/// In-memory [`ProfileSource`] with per-member failure injection
pub struct MockSource {
    roster: Vec<String>,
    profiles: HashMap<String, Value>,
    roster_fails: bool,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pub requests: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            roster: Vec::new(),
            profiles: HashMap::new(),
            roster_fails: false,
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Roster member with a profile document
    pub fn member(mut self, name: &str, document: Value) -> Self {
        self.roster.push(name.to_string());
        self.profiles.insert(slugify(name), document);
        self
    }

    /// Roster member whose profile request fails
    pub fn failing_member(mut self, name: &str) -> Self {
        self.roster.push(name.to_string());
        self
    }

    pub fn failing_roster(mut self) -> Self {
        self.roster_fails = true;
        self
    }

    /// Hold every profile request open for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for MockSource {
    async fn fetch_guild_roster(
        &self,
        realm_slug: &str,
        guild_slug: &str,
    ) -> Result<GuildRoster, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push(format!("roster {}/{}", realm_slug, guild_slug));

        if self.roster_fails {
            return Err(ApiError::Fetch {
                status: 404,
                resource: format!("guild roster {}/{}", realm_slug, guild_slug),
            });
        }

        Ok(GuildRoster {
            members: self
                .roster
                .iter()
                .map(|name| RosterMember {
                    character: RosterCharacter {
                        name: name.clone(),
                        id: None,
                        level: None,
                    },
                    rank: None,
                })
                .collect(),
        })
    }

    async fn fetch_character_profile(
        &self,
        realm_slug: &str,
        character_slug: &str,
    ) -> Result<Value, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push(format!("character {}/{}", realm_slug, character_slug));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.profiles
            .get(character_slug)
            .cloned()
            .ok_or_else(|| ApiError::Fetch {
                status: 404,
                resource: format!("character {}/{}", realm_slug, character_slug),
            })
    }
}

/// Create temporary on-disk database with the schema applied
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for duration of test
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("temp dir");
    let pool = init_database_pool(&temp_dir.path().join("characters.db"))
        .await
        .expect("database init");
    (temp_dir, pool)
}
