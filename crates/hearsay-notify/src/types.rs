use chrono::{DateTime, Utc};
use serde::Serialize;

/// Aggregate result of one dispatch run on one channel.
///
/// `remaining` counts pending mentions left for the next scheduled run
/// after this run's cap; a non-zero value means the backlog continues.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub remaining: i64,
    pub timestamp: DateTime<Utc>,
}
