//! API request/response models, separated from database records.

use serde::Deserialize;
use utoipa::IntoParams;

pub mod partners;
pub mod predictions;
pub mod summaries;

/// Common pagination parameters for list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Number of records to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of records to return (default: 100, max: 1000)
    pub limit: Option<i64>,
}
