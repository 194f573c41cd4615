//! Battle.net API client
//!
//! Authenticates once with the OAuth client-credentials flow, then issues
//! bearer-authenticated GET requests for guild rosters and character profiles.
//! The token is held for the lifetime of the client and never refreshed.
//!
//! Request paths expect slugs (see [`armory_common::slug::slugify`]).

use crate::config::Credentials;
use armory_common::config::ApiConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const USER_AGENT: &str = concat!("armory/", env!("CARGO_PKG_VERSION"));
const NAMESPACE_HEADER: &str = "Battlenet-Namespace";

/// Battle.net client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to obtain access token ({status}): {body}")]
    Authentication { status: u16, body: String },

    #[error("Failed to fetch {resource} ({status})")]
    Fetch { status: u16, resource: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Guild roster document
///
/// Only the fields the import needs are typed; the rest of the document is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuildRoster {
    pub members: Vec<RosterMember>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterMember {
    pub character: RosterCharacter,
    /// Guild rank (0 = guild master)
    pub rank: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterCharacter {
    pub name: String,
    pub id: Option<i64>,
    pub level: Option<i64>,
}

impl GuildRoster {
    /// Member character names in roster order
    pub fn member_names(&self) -> Vec<&str> {
        self.members
            .iter()
            .map(|m| m.character.name.as_str())
            .collect()
    }
}

/// Read operations the import pipeline needs from Battle.net
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the roster of a guild
    async fn fetch_guild_roster(
        &self,
        realm_slug: &str,
        guild_slug: &str,
    ) -> Result<GuildRoster, ApiError>;

    /// Fetch the raw profile document of one character
    async fn fetch_character_profile(
        &self,
        realm_slug: &str,
        character_slug: &str,
    ) -> Result<serde_json::Value, ApiError>;
}

/// Endpoint set for one Battle.net region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleNetEndpoints {
    pub oauth_url: String,
    pub api_base_url: String,
    /// Value of the `Battlenet-Namespace` header
    pub namespace: String,
}

impl BattleNetEndpoints {
    pub fn for_region(region: &str) -> Self {
        let region = region.trim().to_lowercase();
        Self {
            oauth_url: format!("https://{}.battle.net/oauth/token", region),
            api_base_url: format!("https://{}.api.blizzard.com", region),
            namespace: format!("profile-{}", region),
        }
    }

    /// Region endpoints with any URL overrides from configuration applied
    pub fn from_config(api: &ApiConfig) -> Self {
        let mut endpoints = Self::for_region(&api.region);
        if let Some(url) = &api.oauth_url {
            endpoints.oauth_url = url.clone();
        }
        if let Some(url) = &api.base_url {
            endpoints.api_base_url = url.trim_end_matches('/').to_string();
        }
        endpoints
    }
}

/// Battle.net API client
///
/// Owns one HTTP connection pool, released when the client is dropped.
pub struct BattleNetClient {
    http_client: reqwest::Client,
    endpoints: BattleNetEndpoints,
    access_token: String,
}

impl BattleNetClient {
    /// Build a client and exchange credentials for a bearer token
    pub async fn authenticate(
        endpoints: BattleNetEndpoints,
        credentials: &Credentials,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let access_token =
            request_access_token(&http_client, &endpoints.oauth_url, credentials).await?;

        tracing::info!(namespace = %endpoints.namespace, "Obtained Battle.net access token");

        Ok(Self {
            http_client,
            endpoints,
            access_token,
        })
    }

    pub fn endpoints(&self) -> &BattleNetEndpoints {
        &self.endpoints
    }

    /// Authenticated GET returning a decoded JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: String) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "Querying Battle.net API");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(NAMESPACE_HEADER, &self.endpoints.namespace)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Fetch {
                status: status.as_u16(),
                resource,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("{}: {}", resource, e)))
    }
}

#[async_trait]
impl ProfileSource for BattleNetClient {
    async fn fetch_guild_roster(
        &self,
        realm_slug: &str,
        guild_slug: &str,
    ) -> Result<GuildRoster, ApiError> {
        let url = format!(
            "{}/data/wow/guild/{}/{}/roster",
            self.endpoints.api_base_url, realm_slug, guild_slug
        );
        self.get_json(&url, format!("guild roster {}/{}", realm_slug, guild_slug))
            .await
    }

    async fn fetch_character_profile(
        &self,
        realm_slug: &str,
        character_slug: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let url = format!(
            "{}/profile/wow/character/{}/{}",
            self.endpoints.api_base_url, realm_slug, character_slug
        );
        self.get_json(&url, format!("character {}/{}", realm_slug, character_slug))
            .await
    }
}

/// Client-credentials token exchange
async fn request_access_token(
    http_client: &reqwest::Client,
    oauth_url: &str,
    credentials: &Credentials,
) -> Result<String, ApiError> {
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
    ];

    let response = http_client
        .post(oauth_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Authentication {
            status: status.as_u16(),
            body,
        });
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Parse(format!("token response: {}", e)))?;

    Ok(token.access_token)
}
