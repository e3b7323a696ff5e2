use minijinja::Environment;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Extension of the files picked up by the loader
const TEMPLATE_EXTENSION: &str = "html";

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to load templates: {0}")]
    LoadError(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Loaded template environment, shared read-only by all handlers
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Load every `.html` file under `dir`, named by its path relative to `dir`
    /// with `/` separators (e.g. `search/search.html`).
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TemplateError::LoadError(format!(
                "template directory '{}' does not exist",
                dir.display()
            )));
        }

        let mut env = Environment::new();
        load_templates_recursive(&mut env, dir, dir)?;
        tracing::info!(
            "Loaded {} templates from {}",
            env.templates().count(),
            dir.display()
        );

        Ok(Self { env })
    }

    /// Render a template with any serializable context
    pub fn render<S: Serialize>(&self, template_name: &str, ctx: S) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }

    /// Check if a template exists
    pub fn has_template(&self, template_name: &str) -> bool {
        self.env.get_template(template_name).is_ok()
    }
}

fn load_templates_recursive(
    env: &mut Environment<'static>,
    base_path: &Path,
    current_path: &Path,
) -> Result<(), TemplateError> {
    let entries = std::fs::read_dir(current_path)
        .map_err(|e| TemplateError::LoadError(format!("{}: {}", current_path.display(), e)))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            load_templates_recursive(env, base_path, &path)?;
        } else if path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
            let Ok(relative) = path.strip_prefix(base_path) else {
                continue;
            };
            let template_name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read_to_string(&path)
                .map_err(|e| TemplateError::LoadError(format!("{}: {}", path.display(), e)))?;

            // Templates live for the whole process, leaking keeps the environment 'static
            let static_name: &'static str = Box::leak(template_name.into_boxed_str());
            let static_content: &'static str = Box::leak(content.into_boxed_str());
            env.add_template(static_name, static_content)
                .map_err(|e| TemplateError::LoadError(format!("{}: {}", static_name, e)))?;
            tracing::debug!("Loaded template: {}", static_name);
        }
    }

    Ok(())
}
