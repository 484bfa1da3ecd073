//! HTTP Handlers

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::{CurrentUser, RequireAdmin, RequireStoreOwner};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::WithRejection;
use kernel::error::app_error::AppError;
use kernel::id::{RatingId, StoreId};

use crate::application::{
    CatalogQueries, CreateStoreInput, CreateStoreUseCase, DeleteStoreUseCase, RateStoreInput,
    RateStoreUseCase, StatsUseCase, UpdateRatingUseCase,
};
use crate::domain::entities::{Rating, Store};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::error::CatalogResult;
use crate::presentation::dto::{
    CreateRatingRequest, CreateStoreRequest, RatingResponse, StatsResponse, StoreResponse,
    UpdateRatingRequest,
};

/// Shared state for catalog handlers
pub struct CatalogAppState<U, C> {
    pub users: Arc<U>,
    pub repo: Arc<C>,
}

impl<U, C> Clone for CatalogAppState<U, C> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            repo: Arc::clone(&self.repo),
        }
    }
}

// ============================================================================
// Administration
// ============================================================================

/// GET /api/admin/stats
pub async fn stats<U, C>(
    RequireAdmin(_): RequireAdmin,
    State(state): State<CatalogAppState<U, C>>,
) -> CatalogResult<Json<StatsResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let stats = StatsUseCase::new(state.repo.clone(), state.users.clone())
        .execute()
        .await?;
    Ok(Json(stats.into()))
}

/// POST /api/admin/stores
pub async fn create_store<U, C>(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<CatalogAppState<U, C>>,
    WithRejection(Json(req), _): WithRejection<Json<CreateStoreRequest>, AppError>,
) -> CatalogResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let input = CreateStoreInput {
        name: req.name,
        email: req.email,
        address: req.address,
        owner_id: req.owner_id,
    };

    let store = CreateStoreUseCase::new(state.repo.clone(), state.users.clone())
        .execute(input)
        .await?;

    tracing::debug!(
        admin_id = %admin.user_id(),
        store_id = %store.store_id,
        "Store created by admin"
    );

    Ok((StatusCode::CREATED, Json(StoreResponse::from(&store))))
}

/// DELETE /api/admin/stores/{id}
pub async fn delete_store<U, C>(
    RequireAdmin(_): RequireAdmin,
    State(state): State<CatalogAppState<U, C>>,
    Path(id): Path<String>,
) -> CatalogResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let store_id: StoreId = id.parse().map_err(AppError::from)?;
    DeleteStoreUseCase::new(state.repo.clone())
        .execute(store_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Stores
// ============================================================================

/// GET /api/stores
pub async fn list_stores<U, C>(
    State(state): State<CatalogAppState<U, C>>,
) -> CatalogResult<Json<Vec<StoreResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let stores = CatalogQueries::new(state.repo.clone()).list_stores().await?;
    Ok(stores_json(&stores))
}

/// GET /api/stores/{id}
pub async fn get_store<U, C>(
    State(state): State<CatalogAppState<U, C>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<StoreResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let store_id: StoreId = id.parse().map_err(AppError::from)?;
    let store = CatalogQueries::new(state.repo.clone())
        .get_store(store_id)
        .await?;
    Ok(Json(StoreResponse::from(&store)))
}

/// GET /api/stores/{id}/ratings
pub async fn store_ratings<U, C>(
    State(state): State<CatalogAppState<U, C>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<Vec<RatingResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let store_id: StoreId = id.parse().map_err(AppError::from)?;
    let ratings = CatalogQueries::new(state.repo.clone())
        .store_ratings(store_id)
        .await?;
    Ok(ratings_json(&ratings))
}

/// GET /api/owner/stores
pub async fn owner_stores<U, C>(
    RequireStoreOwner(owner): RequireStoreOwner,
    State(state): State<CatalogAppState<U, C>>,
) -> CatalogResult<Json<Vec<StoreResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let stores = CatalogQueries::new(state.repo.clone())
        .owner_stores(owner.user_id())
        .await?;
    Ok(stores_json(&stores))
}

// ============================================================================
// Ratings
// ============================================================================

/// GET /api/ratings
///
/// The caller's own ratings; anonymous callers get an empty list.
pub async fn my_ratings<U, C>(
    current: Option<CurrentUser>,
    State(state): State<CatalogAppState<U, C>>,
) -> CatalogResult<Json<Vec<RatingResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let Some(current) = current else {
        return Ok(Json(Vec::new()));
    };

    let ratings = CatalogQueries::new(state.repo.clone())
        .user_ratings(current.user_id())
        .await?;
    Ok(ratings_json(&ratings))
}

/// POST /api/ratings
pub async fn create_rating<U, C>(
    current: CurrentUser,
    State(state): State<CatalogAppState<U, C>>,
    WithRejection(Json(req), _): WithRejection<Json<CreateRatingRequest>, AppError>,
) -> CatalogResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let input = RateStoreInput {
        store_id: req.store_id,
        rating: req.rating,
    };

    let rating = RateStoreUseCase::new(state.repo.clone())
        .execute(current.user_id(), input)
        .await?;

    Ok((StatusCode::CREATED, Json(RatingResponse::from(&rating))))
}

/// PATCH /api/ratings/{id}
pub async fn update_rating<U, C>(
    current: CurrentUser,
    State(state): State<CatalogAppState<U, C>>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateRatingRequest>, AppError>,
) -> CatalogResult<Json<RatingResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let rating_id: RatingId = id.parse().map_err(AppError::from)?;

    let rating = UpdateRatingUseCase::new(state.repo.clone())
        .execute(current.user_id(), rating_id, req.rating)
        .await?;

    Ok(Json(RatingResponse::from(&rating)))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn stores_json(stores: &[Store]) -> Json<Vec<StoreResponse>> {
    Json(stores.iter().map(StoreResponse::from).collect())
}

fn ratings_json(ratings: &[Rating]) -> Json<Vec<RatingResponse>> {
    Json(ratings.iter().map(RatingResponse::from).collect())
}
