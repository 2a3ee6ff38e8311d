use serde::{Deserialize, Serialize};

/// Version-controlled working tree that receives scripted objects.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RepoConfig {
    /// Root of the working tree. Deployments refuse to run without it.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            path: None,
            remote: default_remote(),
            branch: default_branch(),
            program: default_program(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_program() -> String {
    "git".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}
