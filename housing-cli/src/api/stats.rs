use axum::Json;
use axum::extract::State;

use crate::config::repository::{self, Stats};

use super::auth::CurrentUser;
use super::error::ApiError;
use super::state::AppState;

pub async fn get_stats(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Stats>, ApiError> {
    Ok(Json(repository::get_stats(&state.pool).await?))
}
