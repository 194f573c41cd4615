//! Dashboard filters and derived views
//!
//! Three filters narrow the dataset: class, guild+realm, and level 70 only.
//! Four views are derived from what remains: total count, mean item level,
//! level histogram, and a class breakdown (or a specialization breakdown once
//! a class is selected).

use armory_common::{Character, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Level targeted by the level filter
pub const MAX_LEVEL: i64 = 70;

/// Separator between guild and realm in the guild filter value
const GUILD_REALM_SEPARATOR: &str = " - ";

/// Raw filter query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub class: Option<String>,
    /// `"<guild> - <realm>"`
    pub guild: Option<String>,
    /// `"true"` or `"false"`
    pub level_70: Option<String>,
}

/// Guild and realm pair selected by the guild filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRealm {
    pub guild: String,
    pub realm: String,
}

impl GuildRealm {
    /// Parse `"<guild> - <realm>"`
    pub fn parse(value: &str) -> Result<Self> {
        let (guild, realm) = value.rsplit_once(GUILD_REALM_SEPARATOR).ok_or_else(|| {
            Error::InvalidInput(format!(
                "guild filter must look like \"<guild>{}<realm>\", got {:?}",
                GUILD_REALM_SEPARATOR, value
            ))
        })?;
        Ok(Self {
            guild: guild.to_string(),
            realm: realm.to_string(),
        })
    }
}

/// Validated dashboard filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFilter {
    pub class: Option<String>,
    pub guild: Option<GuildRealm>,
    pub level_70_only: bool,
}

impl CharacterFilter {
    /// Build from query parameters; empty strings count as "no filter"
    pub fn from_query(query: &DashboardQuery) -> Result<Self> {
        let class = non_empty(query.class.as_deref()).map(str::to_string);
        let guild = non_empty(query.guild.as_deref())
            .map(GuildRealm::parse)
            .transpose()?;
        let level_70_only = match non_empty(query.level_70.as_deref()) {
            None | Some("false") => false,
            Some("true") => true,
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "level_70 must be true or false, got {:?}",
                    other
                )));
            }
        };
        Ok(Self {
            class,
            guild,
            level_70_only,
        })
    }

    pub fn matches(&self, character: &Character) -> bool {
        if let Some(class) = &self.class {
            if &character.character_class != class {
                return false;
            }
        }
        if let Some(selected) = &self.guild {
            if character.guild != selected.guild || character.realm != selected.realm {
                return false;
            }
        }
        !self.level_70_only || character.level == MAX_LEVEL
    }

    pub fn apply<'a>(&self, characters: &'a [Character]) -> Vec<&'a Character> {
        characters.iter().filter(|c| self.matches(c)).collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Choices offered by the class and guild filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub classes: Vec<String>,
    pub guilds: Vec<String>,
}

impl FilterOptions {
    /// Distinct, sorted values over the full dataset
    pub fn from_characters(characters: &[Character]) -> Self {
        let classes: BTreeSet<&str> = characters
            .iter()
            .map(|c| c.character_class.as_str())
            .collect();
        let guilds: BTreeSet<String> = characters.iter().map(Character::guild_label).collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
            guilds: guilds.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelBucket {
    pub level: i64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownDimension {
    CharacterClass,
    ActiveSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownSlice {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub dimension: BreakdownDimension,
    /// Largest first; ties by label
    pub slices: Vec<BreakdownSlice>,
}

/// All four derived views for one filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub total_characters: usize,
    /// Mean of `average_item_level`; None when nothing matches
    pub average_item_level: Option<f64>,
    pub level_histogram: Vec<LevelBucket>,
    pub breakdown: Breakdown,
}

impl DashboardViews {
    pub fn compute(characters: &[Character], filter: &CharacterFilter) -> Self {
        let selected = filter.apply(characters);

        let breakdown = if filter.class.is_some() {
            breakdown(
                BreakdownDimension::ActiveSpec,
                selected.iter().filter_map(|c| c.active_spec.as_deref()),
            )
        } else {
            breakdown(
                BreakdownDimension::CharacterClass,
                selected.iter().map(|c| c.character_class.as_str()),
            )
        };

        Self {
            total_characters: selected.len(),
            average_item_level: mean_item_level(&selected),
            level_histogram: level_histogram(&selected),
            breakdown,
        }
    }
}

fn mean_item_level(characters: &[&Character]) -> Option<f64> {
    if characters.is_empty() {
        return None;
    }
    let sum: i64 = characters.iter().map(|c| c.average_item_level).sum();
    Some(sum as f64 / characters.len() as f64)
}

fn level_histogram(characters: &[&Character]) -> Vec<LevelBucket> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for character in characters {
        *counts.entry(character.level).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(level, count)| LevelBucket { level, count })
        .collect()
}

fn breakdown<'a>(
    dimension: BreakdownDimension,
    labels: impl Iterator<Item = &'a str>,
) -> Breakdown {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut slices: Vec<BreakdownSlice> = counts
        .into_iter()
        .map(|(label, count)| BreakdownSlice {
            label: label.to_string(),
            count,
        })
        .collect();
    slices.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    Breakdown { dimension, slices }
}
