//! Database record structures matching table schemas.

pub mod partners;
pub mod predictions;
