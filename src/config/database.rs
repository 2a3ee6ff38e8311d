use std::fmt;

use serde::{Deserialize, Serialize};

/// Oracle listener port.
pub const DEFAULT_PORT: u16 = 1521;

/// Connection details for one database instance, looked up by alias.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database: String,

    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Scripts folder inside the repository working tree, used when this
    /// database is a deployment destination.
    #[serde(default)]
    pub local_path: Option<String>,
}

impl DatabaseConfig {
    /// `host/database`, used in logs and error messages.
    pub fn target(&self) -> String {
        format!("{}/{}", self.host, self.database)
    }

    /// EZConnect descriptor `host:port/database`.
    pub fn connect_string(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }

    pub fn masked(&self) -> Self {
        Self {
            password: mask(&self.password),
            ..self.clone()
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &mask(&self.password))
            .field("local_path", &self.local_path)
            .finish()
    }
}

/// Named source/destination pair selected by a deploy request.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DeploymentSetConfig {
    pub source: String,
    pub destination: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}
