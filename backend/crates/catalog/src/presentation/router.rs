//! Catalog Router

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use auth::domain::repository::UserRepository;

use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::presentation::handlers::{self, CatalogAppState};

/// Store, rating and dashboard routes (mount under `/api`)
///
/// Role checks rely on `auth::with_session` wrapping the merged router.
pub fn catalog_router<U, C>(users: Arc<U>, repo: Arc<C>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    C: StoreRepository + RatingRepository + Send + Sync + 'static,
{
    let state = CatalogAppState { users, repo };

    Router::new()
        .route("/admin/stats", get(handlers::stats::<U, C>))
        .route("/admin/stores", post(handlers::create_store::<U, C>))
        .route("/admin/stores/{id}", delete(handlers::delete_store::<U, C>))
        .route("/stores", get(handlers::list_stores::<U, C>))
        .route("/stores/{id}", get(handlers::get_store::<U, C>))
        .route("/stores/{id}/ratings", get(handlers::store_ratings::<U, C>))
        .route("/owner/stores", get(handlers::owner_stores::<U, C>))
        .route(
            "/ratings",
            get(handlers::my_ratings::<U, C>).post(handlers::create_rating::<U, C>),
        )
        .route("/ratings/{id}", patch(handlers::update_rating::<U, C>))
        .with_state(state)
}
