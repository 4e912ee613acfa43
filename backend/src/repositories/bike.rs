//! Bike repository for database operations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Bike row from the database
///
/// Position is stored as a nullable latitude/longitude column pair;
/// both are set or both are null.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BikeRecord {
    pub id: i64,
    pub community_id: i64,
    pub name: String,
    pub user_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a bike
#[derive(Debug, Clone)]
pub struct CreateBike {
    pub community_id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Input for updating a bike
///
/// The rider assignment is deliberately absent: `user_id` only changes
/// through the rental operations.
#[derive(Debug, Clone)]
pub struct UpdateBike {
    pub community_id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Bike repository for database operations
pub struct BikeRepository;

impl BikeRepository {
    /// Insert a new bike, returning the stored row
    ///
    /// Fails with a foreign-key violation when `community_id` does not
    /// reference an existing community.
    pub async fn create(pool: &PgPool, input: CreateBike) -> Result<BikeRecord, sqlx::Error> {
        sqlx::query_as::<_, BikeRecord>(
            r#"
            INSERT INTO bikes (community_id, name, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            RETURNING id, community_id, name, user_id, latitude, longitude, created_at
            "#,
        )
        .bind(input.community_id)
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(pool)
        .await
    }

    /// Get a bike by ID
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<BikeRecord>, sqlx::Error> {
        sqlx::query_as::<_, BikeRecord>(
            r#"
            SELECT id, community_id, name, user_id, latitude, longitude, created_at
            FROM bikes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List bikes, optionally filtered by community
    pub async fn list(
        pool: &PgPool,
        community_id: Option<i64>,
    ) -> Result<Vec<BikeRecord>, sqlx::Error> {
        sqlx::query_as::<_, BikeRecord>(
            r#"
            SELECT id, community_id, name, user_id, latitude, longitude, created_at
            FROM bikes
            WHERE ($1::BIGINT IS NULL OR community_id = $1)
            ORDER BY id
            "#,
        )
        .bind(community_id)
        .fetch_all(pool)
        .await
    }

    /// Update a bike's community, name, and position
    ///
    /// Returns None when no bike with this ID exists.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: UpdateBike,
    ) -> Result<Option<BikeRecord>, sqlx::Error> {
        sqlx::query_as::<_, BikeRecord>(
            r#"
            UPDATE bikes
            SET community_id = $2, name = $3, latitude = $4, longitude = $5
            WHERE id = $1
            RETURNING id, community_id, name, user_id, latitude, longitude, created_at
            "#,
        )
        .bind(id)
        .bind(input.community_id)
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_optional(pool)
        .await
    }

    /// Delete a bike
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM bikes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Assign a rider to an unassigned bike
    ///
    /// The `user_id IS NULL` guard makes the rental race-safe: concurrent
    /// attempts resolve in the database and only one caller gets the row
    /// back. Returns None when the bike is missing or already rented.
    pub async fn rent(
        pool: &PgPool,
        id: i64,
        uid: &str,
    ) -> Result<Option<BikeRecord>, sqlx::Error> {
        sqlx::query_as::<_, BikeRecord>(
            r#"
            UPDATE bikes
            SET user_id = $2
            WHERE id = $1 AND user_id IS NULL
            RETURNING id, community_id, name, user_id, latitude, longitude, created_at
            "#,
        )
        .bind(id)
        .bind(uid)
        .fetch_optional(pool)
        .await
    }

    /// Clear the rider assignment, guarded by the current renter's UID
    ///
    /// Returns None when the bike is missing or the UID does not match.
    pub async fn release(
        pool: &PgPool,
        id: i64,
        uid: &str,
    ) -> Result<Option<BikeRecord>, sqlx::Error> {
        sqlx::query_as::<_, BikeRecord>(
            r#"
            UPDATE bikes
            SET user_id = NULL
            WHERE id = $1 AND user_id = $2
            RETURNING id, community_id, name, user_id, latitude, longitude, created_at
            "#,
        )
        .bind(id)
        .bind(uid)
        .fetch_optional(pool)
        .await
    }
}
