//! API handlers for the Atheneum REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod lending;
pub mod members;
pub mod openapi;
pub mod payments;
pub mod stats;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::AppError,
    models::librarian::{AdminClaims, AdminId},
    AppState,
};

/// Extractor for the authenticated librarian's tenant identity.
///
/// Every protected handler takes this extractor, so a request that cannot
/// present a valid token never reaches a service: operations fail closed
/// with NotAuthenticated.
pub struct AuthenticatedAdmin(pub AdminId);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = AdminClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedAdmin(claims.admin_id()))
    }
}

/// Search query parameter shared by the list endpoints
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive containment search
    pub search: Option<String>,
}
