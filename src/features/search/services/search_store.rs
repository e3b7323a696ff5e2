use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::search::dtos::StatusFilter;
use crate::features::search::models::{IncidentSummary, Report};

/// Incident search filter. Bounds are inclusive and already in UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentFilter {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Case-sensitive substring of the incident detail
    pub text: String,
    pub status: StatusFilter,
}

/// Report search filter. Bounds are inclusive and already in UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilter {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Case-sensitive substring of the report description
    pub text: String,
}

/// Read access to the records the search views query
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Distinct incidents linked to at least one service, newest first
    async fn search_incidents(&self, filter: &IncidentFilter) -> Result<Vec<IncidentSummary>>;

    /// Matching reports, highest id first
    async fn search_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>>;

    /// The `limit` highest-id reports, highest first
    async fn recent_reports(&self, limit: i64) -> Result<Vec<Report>>;
}

const REPORT_COLUMNS: &str =
    "id, date, name, email, description, additional, screenshot1, screenshot2";

pub(crate) fn incident_query(filter: &IncidentFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT DISTINCT i.id, i.date, i.closed, i.detail \
         FROM service_issues si \
         JOIN incidents i ON i.id = si.incident_id \
         WHERE i.date BETWEEN ",
    );
    qb.push_bind(filter.start)
        .push(" AND ")
        .push_bind(filter.end);
    // strpos avoids LIKE wildcard escaping and keeps the match case-sensitive
    qb.push(" AND strpos(i.detail, ")
        .push_bind(filter.text.clone())
        .push(") > 0");

    match filter.status {
        StatusFilter::Any => {}
        StatusFilter::Open => {
            qb.push(" AND i.closed IS NULL");
        }
        StatusFilter::Closed => {
            qb.push(" AND i.closed IS NOT NULL");
        }
    }

    qb.push(" ORDER BY i.date DESC");
    qb
}

pub(crate) fn report_query(filter: &ReportFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM reports WHERE date BETWEEN ",
        REPORT_COLUMNS
    ));
    qb.push_bind(filter.start)
        .push(" AND ")
        .push_bind(filter.end);
    qb.push(" AND strpos(description, ")
        .push_bind(filter.text.clone())
        .push(") > 0");
    qb.push(" ORDER BY id DESC");
    qb
}

pub(crate) fn recent_report_query(limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM reports ORDER BY id DESC LIMIT ",
        REPORT_COLUMNS
    ));
    qb.push_bind(limit);
    qb
}

/// PostgreSQL-backed search store
pub struct PgSearchStore {
    pool: PgPool,
}

impl PgSearchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchStore for PgSearchStore {
    async fn search_incidents(&self, filter: &IncidentFilter) -> Result<Vec<IncidentSummary>> {
        let mut qb = incident_query(filter);
        qb.build_query_as::<IncidentSummary>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search incidents: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn search_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let mut qb = report_query(filter);
        qb.build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search reports: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn recent_reports(&self, limit: i64) -> Result<Vec<Report>> {
        let mut qb = recent_report_query(limit);
        qb.build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch recent reports: {:?}", e);
                AppError::Database(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn incident_filter(status: StatusFilter) -> IncidentFilter {
        IncidentFilter {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            text: "outage".to_string(),
            status,
        }
    }

    #[test]
    fn test_incident_query_any_status() {
        let qb = incident_query(&incident_filter(StatusFilter::Any));
        let sql = qb.sql();
        assert!(sql.contains("SELECT DISTINCT i.id, i.date, i.closed, i.detail"));
        assert!(sql.contains("JOIN incidents i ON i.id = si.incident_id"));
        assert!(sql.contains("i.date BETWEEN $1 AND $2"));
        assert!(sql.contains("strpos(i.detail, $3) > 0"));
        assert!(!sql.contains("i.closed IS"));
        assert!(sql.ends_with("ORDER BY i.date DESC"));
    }

    #[test]
    fn test_incident_query_open() {
        let qb = incident_query(&incident_filter(StatusFilter::Open));
        assert!(qb.sql().contains("AND i.closed IS NULL"));
        assert!(!qb.sql().contains("IS NOT NULL"));
    }

    #[test]
    fn test_incident_query_closed() {
        let qb = incident_query(&incident_filter(StatusFilter::Closed));
        assert!(qb.sql().contains("AND i.closed IS NOT NULL"));
    }

    #[test]
    fn test_report_query() {
        let filter = ReportFilter {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            text: String::new(),
        };
        let qb = report_query(&filter);
        let sql = qb.sql();
        assert!(sql.starts_with("SELECT id, date, name, email, description, additional"));
        assert!(sql.contains("date BETWEEN $1 AND $2"));
        assert!(sql.contains("strpos(description, $3) > 0"));
        assert!(sql.ends_with("ORDER BY id DESC"));
    }

    #[test]
    fn test_recent_report_query() {
        let qb = recent_report_query(5);
        assert!(qb.sql().ends_with("FROM reports ORDER BY id DESC LIMIT $1"));
    }
}
