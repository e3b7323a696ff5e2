use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::core::error::Result;
use crate::features::search::dtos::StatusFilter;
use crate::features::search::models::{IncidentSummary, Report};
use crate::features::search::services::{IncidentFilter, ReportFilter, SearchService, SearchStore};
use crate::features::search::routes;
use crate::shared::templates::TemplateEngine;

pub fn template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

fn timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn incident(id: i64, date: &str, closed: Option<&str>, detail: &str) -> IncidentSummary {
    IncidentSummary {
        id,
        date: timestamp(date),
        closed: closed.map(timestamp),
        detail: detail.to_string(),
    }
}

pub fn report(id: i64, date: &str, description: &str) -> Report {
    Report {
        id,
        date: timestamp(date),
        name: format!("Reporter {}", id),
        email: format!("reporter{}@example.com", id),
        description: description.to_string(),
        additional: None,
        screenshot1: None,
        screenshot2: None,
    }
}

/// In-memory store mirroring the SQL semantics of `PgSearchStore`
#[derive(Default)]
pub struct InMemorySearchStore {
    /// (incident, number of service_issues rows linking it)
    incidents: Vec<(IncidentSummary, usize)>,
    reports: Vec<Report>,
}

impl InMemorySearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_incident(self, incident: IncidentSummary) -> Self {
        self.with_incident_on_services(incident, 1)
    }

    /// Incident with no service_issues row
    pub fn with_unlinked_incident(self, incident: IncidentSummary) -> Self {
        self.with_incident_on_services(incident, 0)
    }

    /// Incident affecting `services` services, one service_issues row each
    pub fn with_incident_on_services(mut self, incident: IncidentSummary, services: usize) -> Self {
        self.incidents.push((incident, services));
        self
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.reports.push(report);
        self
    }

    fn reports_by_id_desc(&self) -> Vec<Report> {
        let mut reports = self.reports.clone();
        reports.sort_by(|a, b| b.id.cmp(&a.id));
        reports
    }
}

#[async_trait]
impl SearchStore for InMemorySearchStore {
    async fn search_incidents(&self, filter: &IncidentFilter) -> Result<Vec<IncidentSummary>> {
        // one row per service link, as the join produces them
        let mut results: Vec<IncidentSummary> = self
            .incidents
            .iter()
            .flat_map(|(incident, links)| std::iter::repeat(incident).take(*links))
            .filter(|i| i.date >= filter.start && i.date <= filter.end)
            .filter(|i| i.detail.contains(&filter.text))
            .filter(|i| match filter.status {
                StatusFilter::Any => true,
                StatusFilter::Open => i.closed.is_none(),
                StatusFilter::Closed => i.closed.is_some(),
            })
            .cloned()
            .collect();
        results.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        // DISTINCT
        results.dedup_by_key(|i| i.id);
        Ok(results)
    }

    async fn search_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        Ok(self
            .reports_by_id_desc()
            .into_iter()
            .filter(|r| r.date >= filter.start && r.date <= filter.end)
            .filter(|r| r.description.contains(&filter.text))
            .collect())
    }

    async fn recent_reports(&self, limit: i64) -> Result<Vec<Report>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.reports_by_id_desc().into_iter().take(limit).collect())
    }
}

/// Serve the search routes over `store` with the shipped templates
pub fn test_server(store: InMemorySearchStore, default_timezone: Tz) -> TestServer {
    let service = Arc::new(SearchService::new(Arc::new(store), default_timezone));
    let templates = Arc::new(TemplateEngine::from_dir(template_dir()).unwrap());
    TestServer::new(routes::routes(service, templates)).unwrap()
}
