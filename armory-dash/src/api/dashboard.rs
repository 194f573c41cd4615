//! Dashboard data endpoints
//!
//! Every handler reads the cached dataset; only `POST /api/reload` touches the
//! database.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use armory_common::Character;

use crate::error::{ApiError, ApiResult};
use crate::views::{CharacterFilter, DashboardQuery, DashboardViews, FilterOptions};
use crate::AppState;

/// Filtered character rows
#[derive(Debug, Serialize)]
pub struct CharactersResponse {
    pub total: usize,
    pub characters: Vec<Character>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub rows: usize,
}

fn parse_filter(query: &DashboardQuery) -> ApiResult<CharacterFilter> {
    CharacterFilter::from_query(query).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// GET /api/options
///
/// Distinct classes and guild/realm labels for the filter controls.
pub async fn get_options(State(state): State<AppState>) -> Json<FilterOptions> {
    let characters = state.cache.snapshot().await;
    Json(FilterOptions::from_characters(&characters))
}

/// GET /api/dashboard?class=&guild=&level_70=
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardViews>> {
    let filter = parse_filter(&query)?;
    let characters = state.cache.snapshot().await;
    Ok(Json(DashboardViews::compute(&characters, &filter)))
}

/// GET /api/characters?class=&guild=&level_70=
pub async fn get_characters(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<CharactersResponse>> {
    let filter = parse_filter(&query)?;
    let characters = state.cache.snapshot().await;
    let selected: Vec<Character> = filter.apply(&characters).into_iter().cloned().collect();
    Ok(Json(CharactersResponse {
        total: selected.len(),
        characters: selected,
    }))
}

/// POST /api/reload
pub async fn reload_cache(State(state): State<AppState>) -> ApiResult<Json<ReloadResponse>> {
    let rows = state.cache.reload().await?;
    Ok(Json(ReloadResponse { rows }))
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/options", get(get_options))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/characters", get(get_characters))
        .route("/api/reload", post(reload_cache))
}
