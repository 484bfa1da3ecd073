//! Read-side queries over stores and ratings

use std::sync::Arc;

use kernel::id::{StoreId, UserId};

use crate::domain::entities::{Rating, Store};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::error::{CatalogError, CatalogResult};

pub struct CatalogQueries<C>
where
    C: StoreRepository + RatingRepository,
{
    repo: Arc<C>,
}

impl<C> CatalogQueries<C>
where
    C: StoreRepository + RatingRepository + Sync,
{
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    pub async fn list_stores(&self) -> CatalogResult<Vec<Store>> {
        self.repo.list_stores().await
    }

    pub async fn get_store(&self, store_id: StoreId) -> CatalogResult<Store> {
        self.repo
            .find_store(store_id)
            .await?
            .ok_or(CatalogError::StoreNotFound)
    }

    /// Empty for a store that does not exist
    pub async fn store_ratings(&self, store_id: StoreId) -> CatalogResult<Vec<Rating>> {
        self.repo.list_ratings_by_store(store_id).await
    }

    pub async fn owner_stores(&self, owner_id: UserId) -> CatalogResult<Vec<Store>> {
        self.repo.list_stores_by_owner(owner_id).await
    }

    pub async fn user_ratings(&self, user_id: UserId) -> CatalogResult<Vec<Rating>> {
        self.repo.list_ratings_by_user(user_id).await
    }
}
