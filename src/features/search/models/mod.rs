mod incident;
mod report;

pub use incident::IncidentSummary;
pub use report::Report;
