//! Alert records and the backend client that serves them.

pub mod api;
mod types;

pub use api::{AlertsApi, ApiError, HttpAlertsApi};
pub use types::{
    Alert, AlertFilters, AlertStats, AlertsListResponse, AnalyseResult, CategoryCount,
    FeedCategoryCount, IngestResult, SeverityCount, SortKey,
};
