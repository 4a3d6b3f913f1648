//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over
//! database operations.
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for the two tables
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Repository Pattern
//!
//! Repositories wrap a `&mut PgConnection` and encapsulate all database
//! access for one entity type:
//!
//! ```ignore
//! use insightd::db::handlers::{Partners, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Partners::new(&mut conn);
//!
//!     if let Some(partner) = repo.get_by_id(1).await? {
//!         println!("Found partner: {}", partner.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and run via [`crate::migrator`]. In
//! production the schema is typically managed externally; the in-repo
//! migrations exist for local development and `#[sqlx::test]`.

pub mod errors;
pub mod handlers;
pub mod models;
