//! API DTOs (Data Transfer Objects)

use kernel::id::{RatingId, StoreId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{CatalogStats, Rating, Store};

// ============================================================================
// Requests
// ============================================================================

/// POST /api/admin/stores
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateStoreRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<i64>,
}

/// POST /api/ratings
///
/// Any `userId` in the body is ignored; the author is the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRatingRequest {
    pub store_id: Option<i64>,
    pub rating: Option<i64>,
}

/// PATCH /api/ratings/{id}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRatingRequest {
    pub rating: Option<i64>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<UserId>,
}

impl From<&Store> for StoreResponse {
    fn from(store: &Store) -> Self {
        Self {
            id: store.store_id,
            name: store.name.as_str().to_string(),
            email: store.email.as_str().to_string(),
            address: store.address.as_str().to_string(),
            owner_id: store.owner_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: RatingId,
    pub rating: u8,
    pub user_id: Option<UserId>,
    pub store_id: Option<StoreId>,
}

impl From<&Rating> for RatingResponse {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.rating_id,
            rating: rating.score.get(),
            user_id: rating.user_id,
            store_id: rating.store_id,
        }
    }
}

/// GET /api/admin/stats
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsResponse {
    pub users: u64,
    pub stores: u64,
    pub ratings: u64,
}

impl From<CatalogStats> for StatsResponse {
    fn from(stats: CatalogStats) -> Self {
        Self {
            users: stats.users,
            stores: stats.stores,
            ratings: stats.ratings,
        }
    }
}
