use std::{path::PathBuf, time::Duration};

use thiserror::Error;

use crate::types::DeploymentState;

/// Failures raised by the change-detection and deployment pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to connect to '{target}': {message}")]
    Connection { target: String, message: String },

    #[error("Catalog query failed: {0}")]
    Query(String),

    #[error("The following objects were not found in the source: {}", .names.join(", "))]
    MissingObjects { names: Vec<String> },

    #[error("Scripting tool failed: {0}")]
    ScriptingTool(String),

    #[error("File system error at '{}': {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Version control command '{command}' failed: {message}")]
    VersionControl { command: String, message: String },

    #[error("Script execution failed: {0}")]
    Execution(String),

    #[error("Invalid object name '{input}': {reason}")]
    InvalidObjectName { input: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn missing_objects(mut names: Vec<String>) -> Self {
        names.sort_by_key(|n| n.to_lowercase());
        names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        Self::MissingObjects { names }
    }

    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Short label of the taxonomy entry, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Connection { .. } => "ConnectionError",
            PipelineError::Query(_) => "QueryError",
            PipelineError::MissingObjects { .. } => "MissingObjectError",
            PipelineError::ScriptingTool(_) => "ScriptingToolError",
            PipelineError::FileSystem { .. } => "FileSystemError",
            PipelineError::VersionControl { .. } => "VersionControlError",
            PipelineError::Execution(_) => "ExecutionError",
            PipelineError::InvalidObjectName { .. } => "InvalidObjectName",
            PipelineError::Config(_) => "ConfigError",
        }
    }
}

/// Raised by the deployment orchestrator when a step fails. Carries the
/// state the run was in and the requested objects so the run can be resumed
/// by hand.
#[derive(Error, Debug)]
#[error("Deployment aborted in state {state} ({}): {source}", .source.kind())]
pub struct DeploymentAbortedError {
    pub state: DeploymentState,
    pub objects: Vec<String>,
    #[source]
    pub source: PipelineError,
}

/// Failures of the process-invocation layer. Callers map these into the
/// pipeline taxonomy.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed while waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
}
