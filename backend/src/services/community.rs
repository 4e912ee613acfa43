//! Community service
//!
//! Communities are the organizational grouping that owns bikes. The
//! resource is deliberately minimal: just enough to satisfy the
//! foreign-key relationship and let clients manage the grouping.

use crate::error::ApiError;
use crate::repositories::{CommunityRecord, CommunityRepository};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

/// Maximum community-name length in characters
pub const COMMUNITY_NAME_MAX_CHARS: usize = 64;

/// Input shape for creating a community
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommunityWrite {
    pub name: String,
}

/// Output projection of a stored community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommunityRead {
    pub id: i64,
    pub name: String,
}

impl From<CommunityRecord> for CommunityRead {
    fn from(record: CommunityRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

/// Community service for business logic
pub struct CommunityService;

impl CommunityService {
    /// Validate a write payload, returning the trimmed name
    pub fn validate(input: &CommunityWrite) -> Result<String, ApiError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Name must not be empty".to_string()));
        }
        if name.chars().count() > COMMUNITY_NAME_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "Name must be at most {} characters",
                COMMUNITY_NAME_MAX_CHARS
            )));
        }
        Ok(name.to_string())
    }

    /// Create a community
    pub async fn create(pool: &PgPool, input: CommunityWrite) -> Result<CommunityRead, ApiError> {
        let name = Self::validate(&input)?;
        let record = CommunityRepository::create(pool, &name).await?;
        Ok(record.into())
    }

    /// Get a community by ID
    pub async fn get(pool: &PgPool, id: i64) -> Result<CommunityRead, ApiError> {
        let record = CommunityRepository::get_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Community {} not found", id)))?;
        Ok(record.into())
    }

    /// List all communities
    pub async fn list(pool: &PgPool) -> Result<Vec<CommunityRead>, ApiError> {
        let records = CommunityRepository::list(pool).await?;
        Ok(records.into_iter().map(CommunityRead::from).collect())
    }
}
