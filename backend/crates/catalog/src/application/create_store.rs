//! Create Store Use Case (administrator only)

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use kernel::id::UserId;
use kernel::validation::Violations;
use kernel::value_object::{address::Address, display_name::DisplayName, email::Email};

use crate::domain::entities::{NewStore, Store};
use crate::domain::repository::StoreRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct CreateStoreInput {
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<i64>,
}

pub struct CreateStoreUseCase<C, U>
where
    C: StoreRepository,
    U: UserRepository,
{
    store_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<C, U> CreateStoreUseCase<C, U>
where
    C: StoreRepository + Sync,
    U: UserRepository + Sync,
{
    pub fn new(store_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self {
            store_repo,
            user_repo,
        }
    }

    pub async fn execute(&self, input: CreateStoreInput) -> CatalogResult<Store> {
        let mut v = Violations::new();
        let name = v.check("name", DisplayName::new(&input.name));
        let email = v.check("email", Email::new(&input.email));
        let address = v.check("address", Address::new(&input.address));

        let (name, email, address) = v.finish_with(
            name.zip(email)
                .zip(address)
                .map(|((name, email), address)| (name, email, address)),
        )?;

        let owner_id = input.owner_id.map(UserId::from_raw);
        if let Some(owner_id) = owner_id
            && self.user_repo.find_user(owner_id).await?.is_none()
        {
            return Err(CatalogError::OwnerNotFound);
        }

        let store = self
            .store_repo
            .create_store(NewStore {
                name,
                email,
                address,
                owner_id,
            })
            .await?;

        tracing::info!(
            store_id = %store.store_id,
            owner_id = ?store.owner_id.map(|id| id.get()),
            "Store created"
        );

        Ok(store)
    }
}
