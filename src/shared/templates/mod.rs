//! HTML page templates.
//!
//! Pages are Jinja2 templates under the configured template directory
//! (`templates/` by default), loaded once at start-up and rendered with
//! `minijinja`. `.html` templates are auto-escaped.

pub mod engine;

pub use engine::{TemplateEngine, TemplateError};
