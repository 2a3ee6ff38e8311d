pub mod backup;
pub mod database;
pub mod log;
pub mod repo;
pub mod scripter;
pub mod settings;

pub use backup::BackupConfig;
pub use database::{DEFAULT_PORT, DatabaseConfig, DeploymentSetConfig};
pub use log::LogConfig;
pub use repo::RepoConfig;
pub use scripter::ScripterConfig;
pub use settings::Settings;
