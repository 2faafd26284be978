//! Property CRUD handlers

use axum::extract::State;
use serde_json::{Value, json};

use crate::config::repository::{self, PropertyFilter};
use crate::records::{NewProperty, Property, PropertyUpdate};

use super::auth::{AdminUser, CurrentUser};
use super::communities::check_page;
use super::error::ApiError;
use super::extract::{Json, Path, Query};
use super::state::AppState;

fn not_found() -> ApiError {
    ApiError::NotFound("Property not found".to_string())
}

fn check_filter(filter: &PropertyFilter) -> Result<(), ApiError> {
    check_page(filter.skip, filter.limit)?;

    let bounds = [
        ("min_price", filter.min_price),
        ("max_price", filter.max_price),
        ("min_area", filter.min_area),
        ("max_area", filter.max_area),
        ("min_rent_ratio", filter.min_rent_ratio),
        ("max_rent_ratio", filter.max_rent_ratio),
    ];
    match bounds.iter().find(|(_, v)| matches!(v, Some(v) if *v < 0.0)) {
        Some((name, _)) => Err(ApiError::Validation(format!("{} must be >= 0", name))),
        None => Ok(()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<Property>>, ApiError> {
    check_filter(&filter)?;
    Ok(Json(repository::list_properties(&state.pool, &filter).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Property>, ApiError> {
    repository::get_property(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Create a property under an existing community
pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(new): Json<NewProperty>,
) -> Result<Json<Property>, ApiError> {
    if repository::get_community(&state.pool, new.community_id).await?.is_none() {
        return Err(ApiError::NotFound("Community not found".to_string()));
    }

    let property = repository::create_property(&state.pool, &new).await?;
    log::info!(
        "{} created property {} in community {}",
        admin.sub,
        property.id,
        property.community_id
    );
    Ok(Json(property))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(update): Json<PropertyUpdate>,
) -> Result<Json<Property>, ApiError> {
    let property = repository::update_property(&state.pool, id, update)
        .await?
        .ok_or_else(not_found)?;
    log::info!("{} updated property {}", admin.sub, id);
    Ok(Json(property))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !repository::delete_property(&state.pool, id).await? {
        return Err(not_found());
    }
    log::info!("{} deleted property {}", admin.sub, id);
    Ok(Json(json!({ "message": "Property deleted successfully" })))
}
