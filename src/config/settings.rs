use std::{collections::HashMap, path::PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        BackupConfig, DatabaseConfig, DeploymentSetConfig, LogConfig, RepoConfig, ScripterConfig,
    },
    errors::PipelineError,
};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub logs: LogConfig,

    #[serde(default)]
    pub repo: RepoConfig,

    #[serde(default)]
    pub scripter: ScripterConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub databases: HashMap<String, DatabaseConfig>,

    #[serde(default)]
    pub deployment_sets: HashMap<String, DeploymentSetConfig>,
}

fn get_env_file_name() -> String {
    if let Ok(env_file) = std::env::var("TWIG_ENV_FILE") {
        return env_file;
    }
    match std::env::var("TWIG_ENV") {
        Ok(env) => match env.to_lowercase().as_str() {
            "dev" => ".env.dev".to_string(),
            "test" => ".env.test".to_string(),
            _ => ".env".to_string(),
        },
        Err(_) => ".env".to_string(),
    }
}

fn get_config_file_name() -> String {
    std::env::var("TWIG_CONFIG").unwrap_or_else(|_| "twig".to_string())
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::from_filename(get_env_file_name()).ok();

        let settings = Config::builder()
            .add_source(File::with_name(&get_config_file_name()).required(false))
            // Environment wins over the file. `__` separates nesting levels so
            // aliases may keep single underscores.
            .add_source(
                Environment::with_prefix("TWIG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Looks up a database by alias, ignoring case.
    pub fn database(&self, alias: &str) -> Result<&DatabaseConfig, PipelineError> {
        self.databases
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(alias))
            .map(|(_, db)| db)
            .ok_or_else(|| PipelineError::Config(format!("Unknown database alias '{}'", alias)))
    }

    /// Resolves a deployment set to its (source, destination) databases.
    pub fn deployment_set(
        &self,
        id: &str,
    ) -> Result<(&DatabaseConfig, &DatabaseConfig), PipelineError> {
        let set = self
            .deployment_sets
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(id))
            .map(|(_, set)| set)
            .ok_or_else(|| PipelineError::Config(format!("Unknown deployment set '{}'", id)))?;

        Ok((self.database(&set.source)?, self.database(&set.destination)?))
    }

    pub fn repo_path(&self) -> Result<PathBuf, PipelineError> {
        self.repo
            .path
            .as_ref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| PipelineError::Config("repo.path is not configured".to_string()))
    }

    /// Copy with every password replaced by a fixed mask.
    pub fn masked(&self) -> Self {
        Self {
            databases: self
                .databases
                .iter()
                .map(|(alias, db)| (alias.clone(), db.masked()))
                .collect(),
            ..self.clone()
        }
    }

    pub fn print_config(&self) {
        match serde_json::to_string_pretty(&self.masked()) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("Failed to serialize settings: {}", err),
        }
    }
}
