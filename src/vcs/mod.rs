mod git;

use async_trait::async_trait;

use crate::errors::PipelineError;

pub use git::GitCli;

/// Operations the deployment pipeline needs from the scripts repository.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Discards every local modification to tracked files.
    async fn reset_hard(&self) -> Result<(), PipelineError>;

    async fn pull(&self) -> Result<(), PipelineError>;

    async fn checkout(&self, branch: &str) -> Result<(), PipelineError>;

    /// Whether the working tree differs from the last commit, untracked
    /// files included.
    async fn has_pending_changes(&self) -> Result<bool, PipelineError>;

    /// Stages everything, deletions included.
    async fn stage_all(&self) -> Result<(), PipelineError>;

    async fn commit(&self, message: &str) -> Result<(), PipelineError>;

    async fn push(&self, remote: &str, branch: &str) -> Result<(), PipelineError>;
}
