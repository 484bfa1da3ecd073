//! Update Rating Use Case

use std::sync::Arc;

use kernel::id::{RatingId, UserId};

use crate::application::rate_store::parse_score;
use crate::domain::entities::Rating;
use crate::domain::repository::RatingRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct UpdateRatingUseCase<C>
where
    C: RatingRepository,
{
    rating_repo: Arc<C>,
}

impl<C> UpdateRatingUseCase<C>
where
    C: RatingRepository + Sync,
{
    pub fn new(rating_repo: Arc<C>) -> Self {
        Self { rating_repo }
    }

    /// Score is validated first, then existence, then authorship
    pub async fn execute(
        &self,
        caller: UserId,
        rating_id: RatingId,
        rating: Option<i64>,
    ) -> CatalogResult<Rating> {
        let score = parse_score(rating)?;

        let existing = self
            .rating_repo
            .find_rating(rating_id)
            .await?
            .ok_or(CatalogError::RatingNotFound)?;

        if !existing.is_authored_by(caller) {
            tracing::debug!(rating_id = %rating_id, caller = %caller, "Not the rating author");
            return Err(CatalogError::NotRatingOwner);
        }

        let updated = self.rating_repo.update_rating_score(rating_id, score).await?;

        tracing::info!(
            rating_id = %rating_id,
            from = %existing.score,
            to = %updated.score,
            "Rating updated"
        );

        Ok(updated)
    }
}
