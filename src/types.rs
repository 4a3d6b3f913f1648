//! Common type definitions.
//!
//! Entity identifiers are `BIGSERIAL` columns in PostgreSQL, wrapped in type
//! aliases for readability at call sites:
//!
//! - [`PartnerId`]: partner account identifier
//! - [`PredictionRequestId`]: prediction fact identifier

pub type PartnerId = i64;
pub type PredictionRequestId = i64;
