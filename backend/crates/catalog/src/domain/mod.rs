//! Domain Layer - Stores and ratings
//!
//! This layer contains:
//! - Domain entities (Store, Rating, StoreDeletion, CatalogStats)
//! - Domain value objects (Score)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;
