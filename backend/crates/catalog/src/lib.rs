//! Catalog Backend Module
//!
//! Stores, ratings, and the administrator dashboard.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and queries
//! - `infra/` - Repository implementations (in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Callers are identified by the `auth` session middleware; role checks use
//! the `auth` extractors.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{CatalogError, CatalogResult};
pub use infra::memory::MemoryCatalogRepository;
pub use presentation::router::catalog_router;
