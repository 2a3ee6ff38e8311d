use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::types::{DeploymentState, ObjectName, RunOutcome, ScriptedArtifact};

/// One pass of the deployment pipeline for a set of objects.
///
/// The state only moves forward: `advance` steps to the successor and
/// `abort` jumps to `Aborted` while remembering where the failure happened.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentRun {
    pub id: Uuid,
    pub deployment_set: String,
    pub objects: Vec<ObjectName>,
    pub working_tree: PathBuf,
    pub started_at: DateTime<Local>,
    pub ended_at: Option<DateTime<Local>>,
    pub artifacts: Vec<ScriptedArtifact>,
    pub committed: bool,
    pub pushed: bool,
    pub executed_scripts: Vec<PathBuf>,
    state: DeploymentState,
    aborted_in: Option<DeploymentState>,
}

impl DeploymentRun {
    pub fn new(
        deployment_set: impl Into<String>,
        objects: Vec<ObjectName>,
        working_tree: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            deployment_set: deployment_set.into(),
            objects,
            working_tree: working_tree.into(),
            started_at: Local::now(),
            ended_at: None,
            artifacts: Vec::new(),
            committed: false,
            pushed: false,
            executed_scripts: Vec::new(),
            state: DeploymentState::Idle,
            aborted_in: None,
        }
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    /// State the run was in when it failed.
    pub fn aborted_in(&self) -> Option<DeploymentState> {
        self.aborted_in
    }

    pub(crate) fn advance(&mut self) -> DeploymentState {
        if let Some(next) = self.state.next() {
            self.state = next;
            if next.is_terminal() {
                self.ended_at = Some(Local::now());
            }
        }
        self.state
    }

    pub(crate) fn abort(&mut self) -> DeploymentState {
        let failed_in = self.state;
        if !failed_in.is_terminal() {
            self.aborted_in = Some(failed_in);
            self.state = DeploymentState::Aborted;
            self.ended_at = Some(Local::now());
        }
        self.aborted_in.unwrap_or(failed_in)
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.to_string()).collect()
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.state {
            DeploymentState::Succeeded => Some(RunOutcome::Succeeded),
            DeploymentState::Aborted if self.pushed || !self.executed_scripts.is_empty() => {
                Some(RunOutcome::PartialFailure)
            }
            DeploymentState::Aborted => Some(RunOutcome::Aborted),
            _ => None,
        }
    }
}
