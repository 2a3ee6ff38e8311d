use colored::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Default, Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    #[default]
    Idle,
    ResettingRepo,
    Scripting,
    Committing,
    Pushing,
    Deploying,
    Succeeded,
    Aborted,
}

impl DeploymentState {
    /// The state that follows on success. Terminal states have none.
    pub fn next(&self) -> Option<DeploymentState> {
        match self {
            DeploymentState::Idle => Some(DeploymentState::ResettingRepo),
            DeploymentState::ResettingRepo => Some(DeploymentState::Scripting),
            DeploymentState::Scripting => Some(DeploymentState::Committing),
            DeploymentState::Committing => Some(DeploymentState::Pushing),
            DeploymentState::Pushing => Some(DeploymentState::Deploying),
            DeploymentState::Deploying => Some(DeploymentState::Succeeded),
            DeploymentState::Succeeded | DeploymentState::Aborted => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn to_colored_string(&self) -> String {
        match self {
            DeploymentState::Idle => "IDLE".bright_black().to_string(),
            DeploymentState::ResettingRepo => "RESETTING_REPO".blue().bold().to_string(),
            DeploymentState::Scripting => "SCRIPTING".blue().bold().to_string(),
            DeploymentState::Committing => "COMMITTING".blue().bold().to_string(),
            DeploymentState::Pushing => "PUSHING".blue().bold().to_string(),
            DeploymentState::Deploying => "DEPLOYING".blue().bold().to_string(),
            DeploymentState::Succeeded => "SUCCEEDED".green().bold().to_string(),
            DeploymentState::Aborted => "ABORTED".red().bold().to_string(),
        }
    }
}

/// How a finished run is reported. A run that aborts after the remote was
/// pushed or after a script ran against the destination leaves side effects
/// behind and is reported as a partial failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    Succeeded,
    PartialFailure,
    Aborted,
}

impl RunOutcome {
    pub fn to_colored_string(&self) -> String {
        match self {
            RunOutcome::Succeeded => "SUCCEEDED".green().bold().to_string(),
            RunOutcome::PartialFailure => "PARTIAL_FAILURE".yellow().bold().to_string(),
            RunOutcome::Aborted => "ABORTED".red().bold().to_string(),
        }
    }
}
