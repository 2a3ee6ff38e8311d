use anyhow::{Context as _, Result};
use rust_embed::RustEmbed;
use tera::{Context, Tera};

#[derive(RustEmbed)]
#[folder = "src/assets/env/"]
struct EnvFiles;

/// Values substituted into the env file template.
#[derive(Debug, Clone)]
pub struct EnvDefaults {
    pub repo_path: String,
    pub source_alias: String,
    pub destination_alias: String,
}

impl Default for EnvDefaults {
    fn default() -> Self {
        Self {
            repo_path: "./repo".to_string(),
            source_alias: "beta".to_string(),
            destination_alias: "prod".to_string(),
        }
    }
}

pub fn get_env_file_with_defaults(template_name: &str, defaults: &EnvDefaults) -> Result<String> {
    let file = EnvFiles::get(template_name)
        .ok_or_else(|| anyhow::anyhow!("Failed to find env file template: {}", template_name))?;

    let template_str =
        std::str::from_utf8(file.data.as_ref()).context("Failed to parse template as UTF-8")?;

    let mut ctx = Context::new();
    ctx.insert("repo_path", &defaults.repo_path);
    ctx.insert("source_alias", &defaults.source_alias);
    ctx.insert("destination_alias", &defaults.destination_alias);

    Tera::default()
        .render_str(template_str, &ctx)
        .context("Failed to render env file")
}
