//! In-memory repository implementation
//!
//! Stores and ratings share one `RwLock` so a store deletion and its rating
//! cascade happen in a single critical section.

use std::collections::BTreeMap;
use std::sync::Arc;

use kernel::id::{RatingId, StoreId, UserId};
use tokio::sync::RwLock;

use crate::domain::entities::{NewRating, NewStore, Rating, Store, StoreDeletion};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::domain::value_objects::Score;
use crate::error::{CatalogError, CatalogResult};

struct Tables {
    stores: BTreeMap<StoreId, Store>,
    ratings: BTreeMap<RatingId, Rating>,
    next_store_id: StoreId,
    next_rating_id: RatingId,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            stores: BTreeMap::new(),
            ratings: BTreeMap::new(),
            next_store_id: StoreId::from_raw(1),
            next_rating_id: RatingId::from_raw(1),
        }
    }
}

/// In-memory store and rating repository
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryCatalogRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Store Repository
// ============================================================================

impl StoreRepository for MemoryCatalogRepository {
    async fn create_store(&self, store: NewStore) -> CatalogResult<Store> {
        let mut tables = self.tables.write().await;

        if tables.stores.values().any(|s| s.email == store.email) {
            return Err(CatalogError::StoreEmailTaken);
        }

        let store_id = tables.next_store_id;
        tables.next_store_id = store_id.next();

        let store = store.into_store(store_id);
        tables.stores.insert(store_id, store.clone());
        Ok(store)
    }

    async fn find_store(&self, store_id: StoreId) -> CatalogResult<Option<Store>> {
        Ok(self.tables.read().await.stores.get(&store_id).cloned())
    }

    async fn list_stores(&self) -> CatalogResult<Vec<Store>> {
        Ok(self.tables.read().await.stores.values().cloned().collect())
    }

    async fn list_stores_by_owner(&self, owner_id: UserId) -> CatalogResult<Vec<Store>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.owner_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn delete_store(&self, store_id: StoreId) -> CatalogResult<StoreDeletion> {
        let mut tables = self.tables.write().await;

        let store = tables
            .stores
            .remove(&store_id)
            .ok_or(CatalogError::StoreNotFound)?;

        let before = tables.ratings.len();
        tables
            .ratings
            .retain(|_, rating| rating.store_id != Some(store_id));
        let ratings_removed = before - tables.ratings.len();

        Ok(StoreDeletion {
            store,
            ratings_removed,
        })
    }

    async fn count_stores(&self) -> CatalogResult<u64> {
        Ok(self.tables.read().await.stores.len() as u64)
    }
}

// ============================================================================
// Rating Repository
// ============================================================================

impl RatingRepository for MemoryCatalogRepository {
    async fn create_rating(&self, rating: NewRating) -> CatalogResult<Rating> {
        let mut tables = self.tables.write().await;

        if let Some(store_id) = rating.store_id
            && !tables.stores.contains_key(&store_id)
        {
            return Err(CatalogError::StoreNotFound);
        }

        let rating_id = tables.next_rating_id;
        tables.next_rating_id = rating_id.next();

        let rating = rating.into_rating(rating_id);
        tables.ratings.insert(rating_id, rating.clone());
        Ok(rating)
    }

    async fn find_rating(&self, rating_id: RatingId) -> CatalogResult<Option<Rating>> {
        Ok(self.tables.read().await.ratings.get(&rating_id).cloned())
    }

    async fn update_rating_score(
        &self,
        rating_id: RatingId,
        score: Score,
    ) -> CatalogResult<Rating> {
        let mut tables = self.tables.write().await;
        let rating = tables
            .ratings
            .get_mut(&rating_id)
            .ok_or(CatalogError::RatingNotFound)?;
        rating.set_score(score);
        Ok(rating.clone())
    }

    async fn list_ratings_by_store(&self, store_id: StoreId) -> CatalogResult<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .filter(|r| r.store_id == Some(store_id))
            .cloned()
            .collect())
    }

    async fn list_ratings_by_user(&self, user_id: UserId) -> CatalogResult<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .filter(|r| r.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn count_ratings(&self) -> CatalogResult<u64> {
        Ok(self.tables.read().await.ratings.len() as u64)
    }
}
