use rust_embed::RustEmbed;
use tera::{Context, Tera};

use crate::errors::PipelineError;

#[derive(RustEmbed)]
#[folder = "src/assets/sql/"]
struct Queries;

/// Renders an embedded catalog query template.
pub fn get_query(template_name: &str, context: &Context) -> Result<String, PipelineError> {
    let file = Queries::get(template_name).ok_or_else(|| {
        PipelineError::Query(format!("Query template '{}' not found", template_name))
    })?;

    let template = String::from_utf8_lossy(file.data.as_ref());

    Tera::default()
        .render_str(&template, context)
        .map_err(|e| PipelineError::Query(format!("Failed to render '{}': {}", template_name, e)))
}

/// Escapes a value for use inside a single-quoted SQL literal.
pub fn sql_literal(value: &str) -> String {
    value.replace('\'', "''")
}
