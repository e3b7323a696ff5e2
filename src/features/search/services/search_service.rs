use std::sync::Arc;

use chrono_tz::Tz;

use crate::core::error::Result;
use crate::features::search::dtos::{IncidentResultDto, ReportResultDto, SearchCriteria};
use crate::features::search::services::{IncidentFilter, ReportFilter, SearchStore};
use crate::shared::constants::RECENT_REPORT_LIMIT;
use crate::shared::timezone::resolve_timezone;

/// Service behind the incident and report search views
pub struct SearchService {
    store: Arc<dyn SearchStore>,
    default_timezone: Tz,
}

impl SearchService {
    pub fn new(store: Arc<dyn SearchStore>, default_timezone: Tz) -> Self {
        Self {
            store,
            default_timezone,
        }
    }

    /// Requester's zone from the `timezone` cookie, or the server default
    pub fn resolve_timezone(&self, cookie: Option<&str>) -> Tz {
        resolve_timezone(cookie, self.default_timezone)
    }

    /// Search incidents in the criteria's range, interpreted in `tz`
    pub async fn search_incidents(
        &self,
        criteria: &SearchCriteria,
        tz: Tz,
    ) -> Result<Vec<IncidentResultDto>> {
        let (start, end) = criteria.bounds_in(tz);
        let filter = IncidentFilter {
            start,
            end,
            text: criteria.text.clone(),
            status: criteria.status,
        };
        tracing::debug!("Searching incidents: {:?}", filter);

        let incidents = self.store.search_incidents(&filter).await?;
        tracing::info!(
            "Incident search matched {} incidents (tz={})",
            incidents.len(),
            tz.name()
        );

        Ok(incidents
            .into_iter()
            .map(|incident| IncidentResultDto::localized(incident, tz))
            .collect())
    }

    /// Search reports in the criteria's range, interpreted in `tz`. The status
    /// filter does not apply to reports.
    pub async fn search_reports(
        &self,
        criteria: &SearchCriteria,
        tz: Tz,
    ) -> Result<Vec<ReportResultDto>> {
        let (start, end) = criteria.bounds_in(tz);
        let filter = ReportFilter {
            start,
            end,
            text: criteria.text.clone(),
        };
        tracing::debug!("Searching reports: {:?}", filter);

        let reports = self.store.search_reports(&filter).await?;
        tracing::info!(
            "Report search matched {} reports (tz={})",
            reports.len(),
            tz.name()
        );

        Ok(reports
            .into_iter()
            .map(|report| ReportResultDto::localized(report, tz))
            .collect())
    }

    /// Most recent reports, formatted in `tz`
    pub async fn recent_reports(&self, tz: Tz) -> Result<Vec<ReportResultDto>> {
        let reports = self.store.recent_reports(RECENT_REPORT_LIMIT).await?;

        Ok(reports
            .into_iter()
            .map(|report| ReportResultDto::localized(report, tz))
            .collect())
    }
}
