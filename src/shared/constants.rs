/// Number of reports shown by the recent report view
pub const RECENT_REPORT_LIMIT: i64 = 5;

/// Cookie carrying the requester's IANA timezone name
pub const TIMEZONE_COOKIE: &str = "timezone";

/// URL prefix under which uploaded report screenshots are served
pub const MEDIA_URL: &str = "/media/";

// =============================================================================
// TEMPLATES
// =============================================================================

pub const INCIDENT_SEARCH_TEMPLATE: &str = "search/search.html";
pub const INCIDENT_RESULTS_TEMPLATE: &str = "search/search_results.html";
pub const REPORT_SEARCH_TEMPLATE: &str = "search/rsearch.html";
pub const REPORT_RESULTS_TEMPLATE: &str = "search/rsearch_results.html";

// =============================================================================
// PAGE TITLES
// =============================================================================

pub const INCIDENT_SEARCH_TITLE: &str = "SSD Incident Search";
pub const INCIDENT_RESULTS_TITLE: &str = "SSD Search Results";
pub const REPORT_SEARCH_TITLE: &str = "SSD Incident Report Search";
pub const REPORT_RESULTS_TITLE: &str = "SSD Incident Report Results";
