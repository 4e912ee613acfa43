//! Authentication middleware
//!
//! Provides the Axum extractor that validates bearer tokens and hands the
//! authenticated Firebase UID to handlers. Requests that fail validation
//! are rejected before any application logic runs.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Authenticated user extracted from a Firebase bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Firebase UID (the token's `sub` claim)
    pub uid: String,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        // Check Bearer prefix
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        // Validate against the shared verifier from state
        let claims = app_state
            .verifier()
            .verify(token)
            .await
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(AuthUser { uid: claims.sub })
    }
}
