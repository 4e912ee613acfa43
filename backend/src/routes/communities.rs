//! Community resource API routes
//!
//! Minimal management of the grouping that owns bikes: create, list, and
//! read. Communities referenced by bikes cannot be deleted, so no delete
//! endpoint is exposed.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::community::{CommunityRead, CommunityService, CommunityWrite};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

/// Create community routes
pub fn community_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_community).get(list_communities))
        .route("/:id", get(get_community))
}

/// POST /api/v1/communities - Create a community
#[utoipa::path(
    post,
    path = "/api/v1/communities",
    request_body = CommunityWrite,
    responses(
        (status = 201, description = "Community created", body = CommunityRead),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "communities"
)]
pub async fn create_community(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CommunityWrite>,
) -> Result<(StatusCode, Json<CommunityRead>), ApiError> {
    let community = CommunityService::create(state.db(), input).await?;
    Ok((StatusCode::CREATED, Json(community)))
}

/// GET /api/v1/communities - List communities
#[utoipa::path(
    get,
    path = "/api/v1/communities",
    responses(
        (status = 200, description = "Communities", body = [CommunityRead]),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "communities"
)]
pub async fn list_communities(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<CommunityRead>>, ApiError> {
    let communities = CommunityService::list(state.db()).await?;
    Ok(Json(communities))
}

/// GET /api/v1/communities/{id} - Get a community by ID
#[utoipa::path(
    get,
    path = "/api/v1/communities/{id}",
    params(("id" = i64, Path, description = "Community ID")),
    responses(
        (status = 200, description = "The community", body = CommunityRead),
        (status = 404, description = "No community with this ID"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "communities"
)]
pub async fn get_community(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CommunityRead>, ApiError> {
    let community = CommunityService::get(state.db(), id).await?;
    Ok(Json(community))
}
