//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod bike;
pub mod community;

pub use bike::{BikeRecord, BikeRepository, CreateBike, UpdateBike};
pub use community::{CommunityRecord, CommunityRepository};
