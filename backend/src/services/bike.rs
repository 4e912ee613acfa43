//! Bike service
//!
//! Validates write payloads, persists bikes through the repository, and
//! projects stored rows into the `BikeRead` wire shape. Internal records
//! are never serialized directly; every response goes through the
//! projection.

use crate::error::ApiError;
use crate::repositories::{BikeRecord, BikeRepository, CreateBike, UpdateBike};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

/// Maximum display-name length in characters
pub const BIKE_NAME_MAX_CHARS: usize = 32;

/// Geographic position of a bike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Input shape for creating or updating a bike
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BikeWrite {
    pub community_id: i64,
    pub name: String,
    #[serde(default)]
    pub position: Option<GeoPosition>,
}

/// Output projection of a stored bike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BikeRead {
    pub id: i64,
    pub community_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPosition>,
}

impl From<BikeRecord> for BikeRead {
    /// Pure projection from a stored row to the wire shape
    fn from(record: BikeRecord) -> Self {
        let position = match (record.latitude, record.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPosition {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Self {
            id: record.id,
            community_id: record.community_id,
            name: record.name,
            user_id: record.user_id,
            position,
        }
    }
}

/// Bike service for business logic
pub struct BikeService;

impl BikeService {
    /// Validate a write payload
    ///
    /// Returns the trimmed display name on success. Referential integrity
    /// of `community_id` is left to the database constraint.
    pub fn validate(input: &BikeWrite) -> Result<String, ApiError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Name must not be empty".to_string()));
        }
        if name.chars().count() > BIKE_NAME_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "Name must be at most {} characters",
                BIKE_NAME_MAX_CHARS
            )));
        }

        if let Some(position) = &input.position {
            if !(-90.0..=90.0).contains(&position.latitude) {
                return Err(ApiError::Validation(
                    "Latitude must be between -90 and 90".to_string(),
                ));
            }
            if !(-180.0..=180.0).contains(&position.longitude) {
                return Err(ApiError::Validation(
                    "Longitude must be between -180 and 180".to_string(),
                ));
            }
        }

        Ok(name.to_string())
    }

    /// Create a bike from a validated write payload
    pub async fn create(pool: &PgPool, input: BikeWrite) -> Result<BikeRead, ApiError> {
        let name = Self::validate(&input)?;

        let record = BikeRepository::create(
            pool,
            CreateBike {
                community_id: input.community_id,
                name,
                latitude: input.position.map(|p| p.latitude),
                longitude: input.position.map(|p| p.longitude),
            },
        )
        .await?;

        Ok(record.into())
    }

    /// Get a bike by ID
    pub async fn get(pool: &PgPool, id: i64) -> Result<BikeRead, ApiError> {
        let record = BikeRepository::get_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Bike {} not found", id)))?;

        Ok(record.into())
    }

    /// List bikes, optionally filtered by community
    pub async fn list(pool: &PgPool, community_id: Option<i64>) -> Result<Vec<BikeRead>, ApiError> {
        let records = BikeRepository::list(pool, community_id).await?;
        Ok(records.into_iter().map(BikeRead::from).collect())
    }

    /// Replace a bike's community, name, and position
    pub async fn update(pool: &PgPool, id: i64, input: BikeWrite) -> Result<BikeRead, ApiError> {
        let name = Self::validate(&input)?;

        let record = BikeRepository::update(
            pool,
            id,
            UpdateBike {
                community_id: input.community_id,
                name,
                latitude: input.position.map(|p| p.latitude),
                longitude: input.position.map(|p| p.longitude),
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bike {} not found", id)))?;

        Ok(record.into())
    }

    /// Delete a bike
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), ApiError> {
        let deleted = BikeRepository::delete(pool, id).await?;
        if !deleted {
            return Err(ApiError::NotFound(format!("Bike {} not found", id)));
        }
        Ok(())
    }

    /// Rent a bike for the authenticated user
    ///
    /// Conflicts when the bike already has a rider; the conditional update
    /// in the repository decides races between concurrent renters.
    pub async fn rent(pool: &PgPool, id: i64, uid: &str) -> Result<BikeRead, ApiError> {
        if let Some(record) = BikeRepository::rent(pool, id, uid).await? {
            return Ok(record.into());
        }

        match BikeRepository::get_by_id(pool, id).await? {
            Some(_) => Err(ApiError::Conflict(format!("Bike {} is already rented", id))),
            None => Err(ApiError::NotFound(format!("Bike {} not found", id))),
        }
    }

    /// Return a rented bike
    ///
    /// Only the current renter may release the bike.
    pub async fn release(pool: &PgPool, id: i64, uid: &str) -> Result<BikeRead, ApiError> {
        if let Some(record) = BikeRepository::release(pool, id, uid).await? {
            return Ok(record.into());
        }

        match BikeRepository::get_by_id(pool, id).await? {
            Some(record) if record.user_id.is_none() => Err(ApiError::Conflict(format!(
                "Bike {} is not currently rented",
                id
            ))),
            Some(_) => Err(ApiError::Forbidden(
                "Only the current renter can return this bike".to_string(),
            )),
            None => Err(ApiError::NotFound(format!("Bike {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(user_id: Option<&str>, position: Option<(f64, f64)>) -> BikeRecord {
        BikeRecord {
            id: 7,
            community_id: 3,
            name: "Old Blue".to_string(),
            user_id: user_id.map(String::from),
            latitude: position.map(|(lat, _)| lat),
            longitude: position.map(|(_, lng)| lng),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_projection_maps_all_fields() {
        let read = BikeRead::from(record(Some("uid-1"), Some((52.37, 4.89))));
        assert_eq!(read.id, 7);
        assert_eq!(read.community_id, 3);
        assert_eq!(read.name, "Old Blue");
        assert_eq!(read.user_id.as_deref(), Some("uid-1"));
        assert_eq!(
            read.position,
            Some(GeoPosition {
                latitude: 52.37,
                longitude: 4.89
            })
        );
    }

    #[test]
    fn test_projection_without_rider_or_position() {
        let read = BikeRead::from(record(None, None));
        assert!(read.user_id.is_none());
        assert!(read.position.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let input = BikeWrite {
            community_id: 1,
            name: "   ".to_string(),
            position: None,
        };
        assert!(matches!(
            BikeService::validate(&input),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_accepts_name_at_limit() {
        let input = BikeWrite {
            community_id: 1,
            name: "x".repeat(BIKE_NAME_MAX_CHARS),
            position: None,
        };
        assert!(BikeService::validate(&input).is_ok());
    }

    #[test]
    fn test_validate_rejects_name_over_limit() {
        let input = BikeWrite {
            community_id: 1,
            name: "x".repeat(BIKE_NAME_MAX_CHARS + 1),
            position: None,
        };
        assert!(matches!(
            BikeService::validate(&input),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_trims_surrounding_whitespace() {
        let input = BikeWrite {
            community_id: 1,
            name: "  Old Blue  ".to_string(),
            position: None,
        };
        assert_eq!(BikeService::validate(&input).unwrap(), "Old Blue");
    }

    #[test]
    fn test_validate_rejects_out_of_range_position() {
        let input = BikeWrite {
            community_id: 1,
            name: "Old Blue".to_string(),
            position: Some(GeoPosition {
                latitude: 91.0,
                longitude: 0.0,
            }),
        };
        assert!(matches!(
            BikeService::validate(&input),
            Err(ApiError::Validation(_))
        ));
    }
}
