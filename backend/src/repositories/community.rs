//! Community repository for database operations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Community row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommunityRecord {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Community repository for database operations
pub struct CommunityRepository;

impl CommunityRepository {
    /// Insert a new community, returning the stored row
    pub async fn create(pool: &PgPool, name: &str) -> Result<CommunityRecord, sqlx::Error> {
        sqlx::query_as::<_, CommunityRecord>(
            r#"
            INSERT INTO communities (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Get a community by ID
    pub async fn get_by_id(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<CommunityRecord>, sqlx::Error> {
        sqlx::query_as::<_, CommunityRecord>(
            r#"
            SELECT id, name, created_at
            FROM communities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List all communities
    pub async fn list(pool: &PgPool) -> Result<Vec<CommunityRecord>, sqlx::Error> {
        sqlx::query_as::<_, CommunityRecord>(
            r#"
            SELECT id, name, created_at
            FROM communities
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
