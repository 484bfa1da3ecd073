//! Application Layer
//!
//! Use cases and queries.

pub mod create_store;
pub mod delete_store;
pub mod queries;
pub mod rate_store;
pub mod stats;
pub mod update_rating;

// Re-exports
pub use create_store::{CreateStoreInput, CreateStoreUseCase};
pub use delete_store::DeleteStoreUseCase;
pub use queries::CatalogQueries;
pub use rate_store::{RateStoreInput, RateStoreUseCase};
pub use stats::StatsUseCase;
pub use update_rating::UpdateRatingUseCase;
