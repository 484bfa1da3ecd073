use std::sync::Arc;

use auth::domain::repository::UserRepository;

use crate::domain::entities::CatalogStats;
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::error::CatalogResult;

/// Record counts for the administrator dashboard
pub struct StatsUseCase<C, U>
where
    C: StoreRepository + RatingRepository,
    U: UserRepository,
{
    catalog_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<C, U> StatsUseCase<C, U>
where
    C: StoreRepository + RatingRepository + Sync,
    U: UserRepository + Sync,
{
    pub fn new(catalog_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self {
            catalog_repo,
            user_repo,
        }
    }

    pub async fn execute(&self) -> CatalogResult<CatalogStats> {
        Ok(CatalogStats {
            users: self.user_repo.count_users().await?,
            stores: self.catalog_repo.count_stores().await?,
            ratings: self.catalog_repo.count_ratings().await?,
        })
    }
}
