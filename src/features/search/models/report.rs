use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// User-submitted issue report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Report {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub description: String,
    pub additional: Option<String>,
    pub screenshot1: Option<String>,
    pub screenshot2: Option<String>,
}
