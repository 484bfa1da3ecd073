//! Delete Store Use Case (administrator only)
//!
//! Removes the store together with every rating that references it.

use std::sync::Arc;

use kernel::id::StoreId;

use crate::domain::entities::StoreDeletion;
use crate::domain::repository::StoreRepository;
use crate::error::CatalogResult;

pub struct DeleteStoreUseCase<C>
where
    C: StoreRepository,
{
    store_repo: Arc<C>,
}

impl<C> DeleteStoreUseCase<C>
where
    C: StoreRepository + Sync,
{
    pub fn new(store_repo: Arc<C>) -> Self {
        Self { store_repo }
    }

    pub async fn execute(&self, store_id: StoreId) -> CatalogResult<StoreDeletion> {
        let deletion = self.store_repo.delete_store(store_id).await?;

        tracing::info!(
            store_id = %store_id,
            ratings_removed = deletion.ratings_removed,
            "Store deleted"
        );

        Ok(deletion)
    }
}
