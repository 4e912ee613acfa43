//! Bike resource API routes
//!
//! Standard CRUD over the bike entity plus the rental sub-resource.
//! Every handler requires a valid Firebase bearer token; the `AuthUser`
//! extractor rejects the request before the handler body runs.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::bike::{BikeRead, BikeService, BikeWrite};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Create bike routes
pub fn bike_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_bike).get(list_bikes))
        .route("/:id", get(get_bike).put(update_bike).delete(delete_bike))
        .route("/:id/rental", post(rent_bike).delete(release_bike))
}

/// Query parameters for listing bikes
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBikesQuery {
    /// Restrict the listing to one community
    pub community_id: Option<i64>,
}

/// POST /api/v1/bikes - Create a bike
#[utoipa::path(
    post,
    path = "/api/v1/bikes",
    request_body = BikeWrite,
    responses(
        (status = 201, description = "Bike created", body = BikeRead),
        (status = 400, description = "Validation failed or unknown community"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "bikes"
)]
pub async fn create_bike(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<BikeWrite>,
) -> Result<(StatusCode, Json<BikeRead>), ApiError> {
    let bike = BikeService::create(state.db(), input).await?;
    Ok((StatusCode::CREATED, Json(bike)))
}

/// GET /api/v1/bikes - List bikes
#[utoipa::path(
    get,
    path = "/api/v1/bikes",
    params(ListBikesQuery),
    responses(
        (status = 200, description = "Bikes", body = [BikeRead]),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "bikes"
)]
pub async fn list_bikes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListBikesQuery>,
) -> Result<Json<Vec<BikeRead>>, ApiError> {
    let bikes = BikeService::list(state.db(), query.community_id).await?;
    Ok(Json(bikes))
}

/// GET /api/v1/bikes/{id} - Get a bike by ID
#[utoipa::path(
    get,
    path = "/api/v1/bikes/{id}",
    params(("id" = i64, Path, description = "Bike ID")),
    responses(
        (status = 200, description = "The bike", body = BikeRead),
        (status = 404, description = "No bike with this ID"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "bikes"
)]
pub async fn get_bike(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<BikeRead>, ApiError> {
    let bike = BikeService::get(state.db(), id).await?;
    Ok(Json(bike))
}

/// PUT /api/v1/bikes/{id} - Replace a bike's community, name, and position
///
/// The rider assignment is untouched; it only changes through the rental
/// endpoints.
#[utoipa::path(
    put,
    path = "/api/v1/bikes/{id}",
    params(("id" = i64, Path, description = "Bike ID")),
    request_body = BikeWrite,
    responses(
        (status = 200, description = "Updated bike", body = BikeRead),
        (status = 400, description = "Validation failed or unknown community"),
        (status = 404, description = "No bike with this ID"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "bikes"
)]
pub async fn update_bike(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<BikeWrite>,
) -> Result<Json<BikeRead>, ApiError> {
    let bike = BikeService::update(state.db(), id, input).await?;
    Ok(Json(bike))
}

/// DELETE /api/v1/bikes/{id} - Delete a bike
#[utoipa::path(
    delete,
    path = "/api/v1/bikes/{id}",
    params(("id" = i64, Path, description = "Bike ID")),
    responses(
        (status = 204, description = "Bike deleted"),
        (status = 404, description = "No bike with this ID"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "bikes"
)]
pub async fn delete_bike(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    BikeService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/bikes/{id}/rental - Rent a bike
///
/// The renter is the authenticated caller; no body is accepted.
#[utoipa::path(
    post,
    path = "/api/v1/bikes/{id}/rental",
    params(("id" = i64, Path, description = "Bike ID")),
    responses(
        (status = 200, description = "Bike rented by the caller", body = BikeRead),
        (status = 409, description = "Bike already has a rider"),
        (status = 404, description = "No bike with this ID"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "bikes"
)]
pub async fn rent_bike(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<BikeRead>, ApiError> {
    let bike = BikeService::rent(state.db(), id, &auth.uid).await?;
    Ok(Json(bike))
}

/// DELETE /api/v1/bikes/{id}/rental - Return a rented bike
#[utoipa::path(
    delete,
    path = "/api/v1/bikes/{id}/rental",
    params(("id" = i64, Path, description = "Bike ID")),
    responses(
        (status = 200, description = "Bike returned", body = BikeRead),
        (status = 403, description = "Caller is not the current renter"),
        (status = 409, description = "Bike is not rented"),
        (status = 404, description = "No bike with this ID"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_token" = [])),
    tag = "bikes"
)]
pub async fn release_bike(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<BikeRead>, ApiError> {
    let bike = BikeService::release(state.db(), id, &auth.uid).await?;
    Ok(Json(bike))
}
