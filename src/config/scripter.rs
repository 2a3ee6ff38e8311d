use serde::{Deserialize, Serialize};

/// External scripting tool invocation settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScripterConfig {
    #[serde(default = "default_program")]
    pub program: String,

    /// First argument of every call, ahead of the connection group. Empty
    /// for a tool that takes the arguments directly.
    #[serde(default = "default_subcommand")]
    pub subcommand: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Emit drop-and-recreate scripts guarded by existence checks instead of
    /// plain create scripts.
    #[serde(default = "default_true")]
    pub drop_and_recreate: bool,

    #[serde(default = "default_true")]
    pub file_per_object: bool,

    #[serde(default = "default_true")]
    pub exclude_headers: bool,

    #[serde(default = "default_true")]
    pub display_progress: bool,
}

impl Default for ScripterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            subcommand: default_subcommand(),
            timeout_secs: default_timeout_secs(),
            drop_and_recreate: true,
            file_per_object: true,
            exclude_headers: true,
            display_progress: true,
        }
    }
}

fn default_program() -> String {
    "twig".to_string()
}

fn default_subcommand() -> String {
    "ddl".to_string()
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_true() -> bool {
    true
}
