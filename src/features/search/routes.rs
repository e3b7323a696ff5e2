use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::search::handlers::{self, SearchState};
use crate::features::search::services::SearchService;
use crate::shared::templates::TemplateEngine;

/// Create routes for the search views
///
/// All routes are public. `GET` renders the blank form, `POST` submits it.
pub fn routes(service: Arc<SearchService>, templates: Arc<TemplateEngine>) -> Router {
    Router::new()
        .route(
            "/search",
            get(handlers::incident_search_form).post(handlers::incident_search),
        )
        .route(
            "/rsearch",
            get(handlers::report_search_form).post(handlers::report_search),
        )
        .route("/rsearch/recent", get(handlers::recent_reports))
        .with_state(SearchState { service, templates })
}
