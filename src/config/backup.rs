use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackupConfig {
    /// Base directory; each database gets its own `<host>_<database>` folder
    /// below it.
    #[serde(default = "default_path")]
    pub path: String,

    /// Run log holding the last-run markers, relative to the database folder.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Script every object when no marker has been recorded yet.
    #[serde(default = "default_true")]
    pub full_on_missing_marker: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            log_file: default_log_file(),
            full_on_missing_marker: true,
        }
    }
}

fn default_path() -> String {
    "./backups".to_string()
}

fn default_log_file() -> String {
    "twig-backup.log".to_string()
}

fn default_true() -> bool {
    true
}
