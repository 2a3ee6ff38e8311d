use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::RepoConfig,
    errors::PipelineError,
    process::{Invocation, ProcessOutput, ProcessRunner},
    vcs::VersionControl,
};

/// Drives the `git` command-line client inside one working tree.
pub struct GitCli {
    program: String,
    work_tree: PathBuf,
    timeout: Duration,
    runner: Arc<dyn ProcessRunner>,
}

impl GitCli {
    pub fn new(
        config: &RepoConfig,
        work_tree: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            program: config.program.clone(),
            work_tree: work_tree.into(),
            timeout: Duration::from_secs(config.timeout_secs),
            runner,
        }
    }

    async fn git(&self, args: &[&str]) -> Result<ProcessOutput, PipelineError> {
        let invocation = Invocation::new(&self.program, args.iter().copied())
            .current_dir(&self.work_tree)
            .timeout(self.timeout);

        let command = invocation.display();
        let version_control_error = |message: String| PipelineError::VersionControl {
            command: command.clone(),
            message,
        };

        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| version_control_error(e.to_string()))?;

        if !output.success() {
            return Err(version_control_error(output.failure_message()));
        }

        Ok(output)
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn reset_hard(&self) -> Result<(), PipelineError> {
        self.git(&["reset", "--hard", "HEAD"]).await.map(|_| ())
    }

    async fn pull(&self) -> Result<(), PipelineError> {
        self.git(&["pull"]).await.map(|_| ())
    }

    async fn checkout(&self, branch: &str) -> Result<(), PipelineError> {
        self.git(&["checkout", branch]).await.map(|_| ())
    }

    async fn has_pending_changes(&self) -> Result<bool, PipelineError> {
        let output = self.git(&["status", "--porcelain"]).await?;
        let pending = output.stdout.lines().any(|line| !line.trim().is_empty());
        debug!(pending, "Checked working tree status");
        Ok(pending)
    }

    async fn stage_all(&self) -> Result<(), PipelineError> {
        self.git(&["add", "-A"]).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> Result<(), PipelineError> {
        self.git(&["commit", "-m", message]).await.map(|_| ())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<(), PipelineError> {
        self.git(&["push", "-u", remote, branch]).await.map(|_| ())
    }
}
