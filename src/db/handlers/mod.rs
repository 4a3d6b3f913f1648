//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection, provides strongly-typed
//! operations, and returns domain models from [`crate::db::models`].
//!
//! - [`Partners`]: partner identity records (full [`Repository`] CRUD)
//! - [`PredictionRequests`]: append-only prediction facts plus the
//!   per-partner aggregate COUNT used by the summary service

pub mod partners;
pub mod predictions;
pub mod repository;

pub use partners::Partners;
pub use predictions::PredictionRequests;
pub use repository::Repository;
