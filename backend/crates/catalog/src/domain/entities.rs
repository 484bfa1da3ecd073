//! Domain entities

use chrono::{DateTime, Utc};
use kernel::id::{RatingId, StoreId, UserId};
use kernel::value_object::{address::Address, display_name::DisplayName, email::Email};

use crate::domain::value_objects::Score;

/// A rateable store
#[derive(Debug, Clone)]
pub struct Store {
    pub store_id: StoreId,
    pub name: DisplayName,
    /// Contact email, unique across stores
    pub email: Email,
    pub address: Address,
    /// Weak reference; the user may have any role
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: DisplayName,
    pub email: Email,
    pub address: Address,
    pub owner_id: Option<UserId>,
}

impl NewStore {
    pub fn into_store(self, store_id: StoreId) -> Store {
        Store {
            store_id,
            name: self.name,
            email: self.email,
            address: self.address,
            owner_id: self.owner_id,
            created_at: Utc::now(),
        }
    }
}

/// A user's score for a store
#[derive(Debug, Clone)]
pub struct Rating {
    pub rating_id: RatingId,
    pub score: Score,
    /// Author
    pub user_id: Option<UserId>,
    pub store_id: Option<StoreId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
    pub score: Score,
    pub user_id: Option<UserId>,
    pub store_id: Option<StoreId>,
}

impl NewRating {
    pub fn into_rating(self, rating_id: RatingId) -> Rating {
        let now = Utc::now();
        Rating {
            rating_id,
            score: self.score,
            user_id: self.user_id,
            store_id: self.store_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Rating {
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }

    pub fn set_score(&mut self, score: Score) {
        self.score = score;
        self.updated_at = Utc::now();
    }
}

/// Result of a cascading store deletion
#[derive(Debug, Clone)]
pub struct StoreDeletion {
    pub store: Store,
    /// Ratings that referenced the store, removed in the same critical section
    pub ratings_removed: usize,
}

/// Record counts for the administrator dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub users: u64,
    pub stores: u64,
    pub ratings: u64,
}
