use std::sync::Arc;

use axum::{extract::State, response::Html};
use chrono_tz::Tz;
use minijinja::context;

use crate::core::error::Result;
use crate::core::extractor::{AppForm, TimezoneCookie};
use crate::features::search::dtos::{FormErrors, SearchForm};
use crate::features::search::services::SearchService;
use crate::shared::constants::{
    INCIDENT_RESULTS_TEMPLATE, INCIDENT_RESULTS_TITLE, INCIDENT_SEARCH_TEMPLATE,
    INCIDENT_SEARCH_TITLE, REPORT_RESULTS_TEMPLATE, REPORT_RESULTS_TITLE, REPORT_SEARCH_TEMPLATE,
    REPORT_SEARCH_TITLE,
};
use crate::shared::templates::TemplateEngine;

/// State shared by the search handlers
#[derive(Clone)]
pub struct SearchState {
    pub service: Arc<SearchService>,
    pub templates: Arc<TemplateEngine>,
}

fn render_form(
    state: &SearchState,
    template: &str,
    title: &str,
    tz: Tz,
    form: &SearchForm,
    errors: &FormErrors,
) -> Result<Html<String>> {
    let html = state.templates.render(
        template,
        context! {
            title,
            timezone => tz.name(),
            form,
            errors,
        },
    )?;
    Ok(Html(html))
}

// ============================================================================
// Incident search
// ============================================================================

/// Blank incident search form
pub async fn incident_search_form(
    State(state): State<SearchState>,
    TimezoneCookie(cookie): TimezoneCookie,
) -> Result<Html<String>> {
    let tz = state.service.resolve_timezone(cookie.as_deref());
    render_form(
        &state,
        INCIDENT_SEARCH_TEMPLATE,
        INCIDENT_SEARCH_TITLE,
        tz,
        &SearchForm::default(),
        &FormErrors::default(),
    )
}

/// Submit an incident search.
///
/// Invalid input re-renders the form with field errors; valid input renders
/// the matching incidents, newest first.
pub async fn incident_search(
    State(state): State<SearchState>,
    TimezoneCookie(cookie): TimezoneCookie,
    AppForm(form): AppForm<SearchForm>,
) -> Result<Html<String>> {
    let tz = state.service.resolve_timezone(cookie.as_deref());

    let criteria = match form.clean() {
        Ok(criteria) => criteria,
        Err(errors) => {
            let errors = FormErrors::from(&errors);
            tracing::debug!("Incident search form rejected: {:?}", errors);
            return render_form(
                &state,
                INCIDENT_SEARCH_TEMPLATE,
                INCIDENT_SEARCH_TITLE,
                tz,
                &form,
                &errors,
            );
        }
    };

    let results = state.service.search_incidents(&criteria, tz).await?;
    let html = state.templates.render(
        INCIDENT_RESULTS_TEMPLATE,
        context! {
            title => INCIDENT_RESULTS_TITLE,
            timezone => tz.name(),
            results,
            form,
            errors => FormErrors::default(),
        },
    )?;
    Ok(Html(html))
}

// ============================================================================
// Report search
// ============================================================================

/// Blank report search form
pub async fn report_search_form(
    State(state): State<SearchState>,
    TimezoneCookie(cookie): TimezoneCookie,
) -> Result<Html<String>> {
    let tz = state.service.resolve_timezone(cookie.as_deref());
    render_form(
        &state,
        REPORT_SEARCH_TEMPLATE,
        REPORT_SEARCH_TITLE,
        tz,
        &SearchForm::default(),
        &FormErrors::default(),
    )
}

/// Submit a report search. Same flow as incident search, without the status
/// filter.
pub async fn report_search(
    State(state): State<SearchState>,
    TimezoneCookie(cookie): TimezoneCookie,
    AppForm(form): AppForm<SearchForm>,
) -> Result<Html<String>> {
    let tz = state.service.resolve_timezone(cookie.as_deref());

    let criteria = match form.clean() {
        Ok(criteria) => criteria,
        Err(errors) => {
            let errors = FormErrors::from(&errors);
            tracing::debug!("Report search form rejected: {:?}", errors);
            return render_form(
                &state,
                REPORT_SEARCH_TEMPLATE,
                REPORT_SEARCH_TITLE,
                tz,
                &form,
                &errors,
            );
        }
    };

    let results = state.service.search_reports(&criteria, tz).await?;
    let html = state.templates.render(
        REPORT_RESULTS_TEMPLATE,
        context! {
            title => REPORT_RESULTS_TITLE,
            timezone => tz.name(),
            results,
            form,
            errors => FormErrors::default(),
        },
    )?;
    Ok(Html(html))
}

/// The five most recent reports. Takes no input; the timezone cookie only
/// affects how dates are displayed.
pub async fn recent_reports(
    State(state): State<SearchState>,
    TimezoneCookie(cookie): TimezoneCookie,
) -> Result<Html<String>> {
    let tz = state.service.resolve_timezone(cookie.as_deref());
    let results = state.service.recent_reports(tz).await?;

    let html = state.templates.render(
        REPORT_RESULTS_TEMPLATE,
        context! {
            title => REPORT_RESULTS_TITLE,
            timezone => tz.name(),
            results,
        },
    )?;
    Ok(Html(html))
}
