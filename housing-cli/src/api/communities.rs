//! Community CRUD handlers

use axum::extract::State;
use serde_json::{Value, json};

use crate::config::repository::{self, CommunityFilter, MAX_LIMIT};
use crate::records::{Community, CommunityUpdate, NewCommunity};

use super::auth::{AdminUser, CurrentUser};
use super::error::ApiError;
use super::extract::{Json, Path, Query};
use super::state::AppState;

/// Reject paging outside `skip >= 0`, `1 <= limit <= MAX_LIMIT`
pub(super) fn check_page(skip: i64, limit: i64) -> Result<(), ApiError> {
    if skip < 0 {
        return Err(ApiError::Validation("skip must be >= 0".to_string()));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    Ok(())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Community not found".to_string())
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<CommunityFilter>,
) -> Result<Json<Vec<Community>>, ApiError> {
    check_page(filter.skip, filter.limit)?;
    Ok(Json(repository::list_communities(&state.pool, &filter).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Community>, ApiError> {
    repository::get_community(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(new): Json<NewCommunity>,
) -> Result<Json<Community>, ApiError> {
    new.validate()?;
    let community = repository::create_community(&state.pool, &new).await?;
    log::info!("{} created community {} '{}'", admin.sub, community.id, community.name);
    Ok(Json(community))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(update): Json<CommunityUpdate>,
) -> Result<Json<Community>, ApiError> {
    update.validate()?;
    let community = repository::update_community(&state.pool, id, update)
        .await?
        .ok_or_else(not_found)?;
    log::info!("{} updated community {}", admin.sub, id);
    Ok(Json(community))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !repository::delete_community(&state.pool, id).await? {
        return Err(not_found());
    }
    log::info!("{} deleted community {}", admin.sub, id);
    Ok(Json(json!({ "message": "Community deleted successfully" })))
}
