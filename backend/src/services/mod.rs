//! Business logic services
//!
//! Services encapsulate validation, projection, and error mapping
//! between the HTTP layer and the repositories.

pub mod bike;
pub mod community;

pub use bike::BikeService;
pub use community::CommunityService;
