//! Incident and report search views.
//!
//! Searches officially logged incidents and user-submitted reports by date
//! range and free text, and lists the most recent reports. Dates are entered
//! and displayed in the requester's timezone (`timezone` cookie, falling back
//! to the server default).
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/search` | Incident search form |
//! | POST | `/search` | Incident search results |
//! | GET | `/rsearch` | Report search form |
//! | POST | `/rsearch` | Report search results |
//! | GET | `/rsearch/recent` | Five most recent reports |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{PgSearchStore, SearchService};
