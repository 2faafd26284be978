//! Bearer-token authentication
//!
//! Tokens are HS256 JWTs signed with the configured secret and carry the
//! caller's role. Handlers opt in by taking [`CurrentUser`] (any valid
//! token) or [`AdminUser`] (admin role) as an argument.

use anyhow::{Context, Result};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
}

/// Sign a token for `subject` valid for `ttl_minutes`
pub fn issue_token(secret: &str, subject: &str, role: Role, ttl_minutes: i64) -> Result<String> {
    let claims = Claims {
        sub: subject.to_string(),
        role,
        exp: (Utc::now() + Duration::minutes(ttl_minutes)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign token")
}

/// Verify signature and expiry
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

/// Any authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

/// An authenticated caller with the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let claims = decode_token(&state.settings.secret_key, token).map_err(|e| {
            log::debug!("Rejected bearer token: {}", e);
            ApiError::Unauthorized("Could not validate credentials".to_string())
        })?;

        Ok(CurrentUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(claims) = CurrentUser::from_request_parts(parts, state).await?;
        if claims.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin privileges required".to_string()));
        }
        Ok(AdminUser(claims))
    }
}
