//! Rate Store Use Case
//!
//! The author is always the caller, whatever the payload says.

use std::sync::Arc;

use kernel::id::{StoreId, UserId};
use kernel::validation::Violations;

use crate::domain::entities::{NewRating, Rating};
use crate::domain::repository::RatingRepository;
use crate::domain::value_objects::Score;
use crate::error::CatalogResult;

pub struct RateStoreInput {
    pub store_id: Option<i64>,
    pub rating: Option<i64>,
}

pub struct RateStoreUseCase<C>
where
    C: RatingRepository,
{
    rating_repo: Arc<C>,
}

impl<C> RateStoreUseCase<C>
where
    C: RatingRepository + Sync,
{
    pub fn new(rating_repo: Arc<C>) -> Self {
        Self { rating_repo }
    }

    pub async fn execute(&self, author: UserId, input: RateStoreInput) -> CatalogResult<Rating> {
        let score = parse_score(input.rating)?;

        // Unknown stores are rejected by the repository under its write lock
        let rating = self
            .rating_repo
            .create_rating(NewRating {
                score,
                user_id: Some(author),
                store_id: input.store_id.map(StoreId::from_raw),
            })
            .await?;

        tracing::info!(
            rating_id = %rating.rating_id,
            user_id = %author,
            store_id = ?rating.store_id.map(|id| id.get()),
            score = %rating.score,
            "Rating created"
        );

        Ok(rating)
    }
}

/// Validate the `rating` field of a payload
pub(crate) fn parse_score(rating: Option<i64>) -> CatalogResult<Score> {
    let mut v = Violations::new();
    let score = match rating {
        Some(value) => v.check("rating", Score::new(value)),
        None => {
            v.push("rating", "Rating is required");
            None
        }
    };
    Ok(v.finish_with(score)?)
}
