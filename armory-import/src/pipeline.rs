//! Guild import pipeline
//!
//! One run: roster fetch → concurrent profile fetch per member → mapping →
//! batch upsert. A member whose fetch or mapping fails is skipped without
//! affecting the others; only the roster fetch and the store write can fail
//! the run.
//!
//! # Ordering
//! The roster fetch completes before any profile fetch starts. Profile fetches
//! run concurrently on the calling task with no cap and finish in any order.
//! The store transaction begins only after every fetch has completed.

use crate::client::{ApiError, ProfileSource};
use crate::error::ImportResult;
use crate::mapper::{map_character, MappingError};
use armory_common::db::{upsert_characters, UpsertPolicy};
use armory_common::slug::slugify;
use armory_common::Character;
use futures::future::join_all;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

/// Why a roster member was left out of the import
#[derive(Debug, Error)]
pub enum SkipReason {
    /// Profile request failed
    #[error("fetch failed: {0}")]
    Fetch(#[source] ApiError),

    /// Profile document did not have the expected shape
    #[error("mapping failed: {0}")]
    Mapping(#[source] MappingError),
}

/// Category of a [`SkipReason`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipKind {
    Fetch,
    Mapping,
}

impl SkipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipKind::Fetch => "fetch",
            SkipKind::Mapping => "mapping",
        }
    }
}

impl SkipReason {
    pub fn kind(&self) -> SkipKind {
        match self {
            SkipReason::Fetch(_) => SkipKind::Fetch,
            SkipReason::Mapping(_) => SkipKind::Mapping,
        }
    }
}

/// Roster member that could not be imported
#[derive(Debug)]
pub struct SkippedMember {
    pub name: String,
    pub reason: SkipReason,
}

/// Per-member result of the fan-out
#[derive(Debug)]
pub enum MemberOutcome {
    Imported(Character),
    Skipped(SkippedMember),
}

/// Roster fan-out result before anything is stored
#[derive(Debug)]
pub struct RosterImport {
    pub realm_slug: String,
    pub guild_slug: String,
    pub outcomes: Vec<MemberOutcome>,
}

impl RosterImport {
    /// Split outcomes into imported characters and skipped members
    pub fn into_parts(self) -> (Vec<Character>, Vec<SkippedMember>) {
        let mut imported = Vec::new();
        let mut skipped = Vec::new();
        for outcome in self.outcomes {
            match outcome {
                MemberOutcome::Imported(character) => imported.push(character),
                MemberOutcome::Skipped(member) => skipped.push(member),
            }
        }
        (imported, skipped)
    }
}

/// Outcome of a completed import run
#[derive(Debug)]
pub struct ImportReport {
    /// Characters written to the store
    pub imported: Vec<Character>,
    /// Members left out of the batch
    pub skipped: Vec<SkippedMember>,
}

impl ImportReport {
    /// Number of skipped members of the given kind
    pub fn skipped_by_kind(&self, kind: SkipKind) -> usize {
        self.skipped
            .iter()
            .filter(|m| m.reason.kind() == kind)
            .count()
    }
}

/// Fetch and map every roster member of a guild without storing anything
///
/// Fails only if the roster itself cannot be fetched.
pub async fn collect_characters<S>(
    source: &S,
    realm: &str,
    guild: &str,
    locale: &str,
) -> Result<RosterImport, ApiError>
where
    S: ProfileSource + ?Sized,
{
    let realm_slug = slugify(realm);
    let guild_slug = slugify(guild);

    let roster = source.fetch_guild_roster(&realm_slug, &guild_slug).await?;
    info!(
        realm = %realm_slug,
        guild = %guild_slug,
        members = roster.members.len(),
        "Fetched guild roster"
    );

    let realm_ref = realm_slug.as_str();
    let fetches = roster.member_names().into_iter().map(|name| async move {
        let character_slug = slugify(name);
        let fetched = source.fetch_character_profile(realm_ref, &character_slug).await;
        (name.to_string(), fetched)
    });

    let outcomes = join_all(fetches)
        .await
        .into_iter()
        .map(|(name, fetched)| {
            let mapped = fetched
                .map_err(SkipReason::Fetch)
                .and_then(|document| map_character(&document, locale).map_err(SkipReason::Mapping));

            match mapped {
                Ok(character) => MemberOutcome::Imported(character),
                Err(reason) => {
                    debug!(member = %name, kind = reason.kind().as_str(), error = %reason, "Skipping roster member");
                    MemberOutcome::Skipped(SkippedMember { name, reason })
                }
            }
        })
        .collect();

    Ok(RosterImport {
        realm_slug,
        guild_slug,
        outcomes,
    })
}

/// Import one guild into the store
pub async fn import_guild<S>(
    source: &S,
    pool: &SqlitePool,
    policy: &UpsertPolicy,
    realm: &str,
    guild: &str,
    locale: &str,
) -> ImportResult<ImportReport>
where
    S: ProfileSource + ?Sized,
{
    let roster_import = collect_characters(source, realm, guild, locale).await?;
    let (imported, skipped) = roster_import.into_parts();

    upsert_characters(pool, &imported, policy).await?;

    let report = ImportReport { imported, skipped };
    info!(
        imported = report.imported.len(),
        skipped_fetch = report.skipped_by_kind(SkipKind::Fetch),
        skipped_mapping = report.skipped_by_kind(SkipKind::Mapping),
        "Guild import committed"
    );

    Ok(report)
}
