//! HTML template rendering for the server-rendered pages.
//!
//! Templates are embedded into the binary at compile time so rendering
//! does not depend on the process working directory.

use minijinja::{Environment, Value};
use std::sync::OnceLock;

use crate::core::error::AppError;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_template("upload.html", include_str!("../../templates/upload.html"))
        .expect("upload.html template is valid");
    env
}

/// Render a named template with the given context.
pub fn render_template(name: &str, context: Value) -> Result<String, AppError> {
    let env = TEMPLATE_ENV.get_or_init(init_environment);

    let template = env
        .get_template(name)
        .map_err(|_| AppError::Internal(format!("Template '{}' not found", name)))?;

    template
        .render(context)
        .map_err(|e| AppError::Internal(format!("Failed to render template '{}': {}", name, e)))
}
