mod search_service;
mod search_store;

pub use search_service::SearchService;
pub use search_store::{IncidentFilter, PgSearchStore, ReportFilter, SearchStore};
