//! Repository Traits

use kernel::id::{RatingId, StoreId, UserId};

use crate::domain::entities::{NewRating, NewStore, Rating, Store, StoreDeletion};
use crate::domain::value_objects::Score;
use crate::error::CatalogResult;

/// Store repository trait
#[trait_variant::make(StoreRepository: Send)]
pub trait LocalStoreRepository {
    /// Insert under the next id; `StoreEmailTaken` if the email is in use
    async fn create_store(&self, store: NewStore) -> CatalogResult<Store>;

    async fn find_store(&self, store_id: StoreId) -> CatalogResult<Option<Store>>;

    /// All stores ordered by id
    async fn list_stores(&self) -> CatalogResult<Vec<Store>>;

    async fn list_stores_by_owner(&self, owner_id: UserId) -> CatalogResult<Vec<Store>>;

    /// Remove the store and every rating that references it, atomically
    ///
    /// `StoreNotFound` leaves both tables untouched.
    async fn delete_store(&self, store_id: StoreId) -> CatalogResult<StoreDeletion>;

    async fn count_stores(&self) -> CatalogResult<u64>;
}

/// Rating repository trait
#[trait_variant::make(RatingRepository: Send)]
pub trait LocalRatingRepository {
    /// Insert under the next id
    ///
    /// A `store_id` that does not exist at insert time is `StoreNotFound`.
    async fn create_rating(&self, rating: NewRating) -> CatalogResult<Rating>;

    async fn find_rating(&self, rating_id: RatingId) -> CatalogResult<Option<Rating>>;

    /// `RatingNotFound` if absent
    async fn update_rating_score(&self, rating_id: RatingId, score: Score)
    -> CatalogResult<Rating>;

    async fn list_ratings_by_store(&self, store_id: StoreId) -> CatalogResult<Vec<Rating>>;

    async fn list_ratings_by_user(&self, user_id: UserId) -> CatalogResult<Vec<Rating>>;

    async fn count_ratings(&self) -> CatalogResult<u64>;
}
