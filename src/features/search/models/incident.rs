use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Incident row returned by incident search, one per incident regardless of
/// how many services it affects
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct IncidentSummary {
    pub id: i64,
    pub date: DateTime<Utc>,
    /// Null while the incident is open
    pub closed: Option<DateTime<Utc>>,
    pub detail: String,
}

impl IncidentSummary {
    pub fn is_open(&self) -> bool {
        self.closed.is_none()
    }
}
