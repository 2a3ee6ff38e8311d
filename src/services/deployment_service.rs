use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Local, TimeZone};
use itertools::Itertools;
use tracing::{Instrument, error, info, info_span, warn};

use crate::{
    config::{DatabaseConfig, Settings},
    db::DatabaseConnector,
    errors::{DeploymentAbortedError, PipelineError},
    scripting::{ScriptOptions, ScriptingAdapter},
    types::{DeploymentRun, DeploymentState, ObjectName},
    utils::{ProgressReporter, commit_timestamp, read_script_batches},
    vcs::VersionControl,
};

/// Source and destination databases of a deployment set.
#[derive(Debug, Clone)]
pub struct DeploymentTargets {
    pub source: DatabaseConfig,
    pub destination: DatabaseConfig,
}

/// Drives a deployment run through reset, scripting, commit, push and
/// execution against the destination. Steps run strictly in order and the
/// first failure aborts the run. Nothing is rolled back: a failure after the
/// push leaves the remote updated.
pub struct DeploymentService {
    settings: Settings,
    vcs: Arc<dyn VersionControl>,
    scripting: Arc<ScriptingAdapter>,
    connector: Arc<dyn DatabaseConnector>,
}

impl DeploymentService {
    pub fn new(
        settings: Settings,
        vcs: Arc<dyn VersionControl>,
        scripting: Arc<ScriptingAdapter>,
        connector: Arc<dyn DatabaseConnector>,
    ) -> Self {
        Self {
            settings,
            vcs,
            scripting,
            connector,
        }
    }

    /// Resolves the deployment set and creates an idle run for the objects.
    pub fn prepare(
        &self,
        set_id: &str,
        objects: Vec<ObjectName>,
    ) -> Result<(DeploymentRun, DeploymentTargets), PipelineError> {
        if objects.is_empty() {
            return Err(PipelineError::Config(
                "At least one object name is required".to_string(),
            ));
        }

        let (source, destination) = self.settings.deployment_set(set_id)?;
        let repo_root = self.settings.repo_path()?;
        let working_tree = destination_working_tree(&repo_root, destination);

        let mut unique: Vec<ObjectName> = Vec::with_capacity(objects.len());
        for object in objects {
            if !unique.contains(&object) {
                unique.push(object);
            }
        }

        Ok((
            DeploymentRun::new(set_id, unique, working_tree),
            DeploymentTargets {
                source: source.clone(),
                destination: destination.clone(),
            },
        ))
    }

    pub async fn run(
        &self,
        run: &mut DeploymentRun,
        targets: &DeploymentTargets,
        progress: &ProgressReporter,
    ) -> Result<(), DeploymentAbortedError> {
        let span = info_span!("deployment", run_id = %run.id, set = %run.deployment_set);

        async {
            info!(
                objects = ?run.object_names(),
                source = %targets.source.target(),
                destination = %targets.destination.target(),
                working_tree = %run.working_tree.display(),
                "Starting deployment"
            );

            loop {
                let state = run.advance();
                if state.is_terminal() {
                    break;
                }

                info!(%state, "Entering state");
                if let Err(source) = self.execute_step(state, run, targets, progress).await {
                    let failed_in = run.abort();
                    error!(state = %failed_in, kind = source.kind(), error = %source, "Deployment aborted");
                    return Err(DeploymentAbortedError {
                        state: failed_in,
                        objects: run.object_names(),
                        source,
                    });
                }
            }

            info!(
                committed = run.committed,
                executed = run.executed_scripts.len(),
                "Deployment succeeded"
            );
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn execute_step(
        &self,
        state: DeploymentState,
        run: &mut DeploymentRun,
        targets: &DeploymentTargets,
        progress: &ProgressReporter,
    ) -> Result<(), PipelineError> {
        match state {
            DeploymentState::ResettingRepo => self.reset_repo(progress).await,
            DeploymentState::Scripting => self.script(run, targets, progress).await,
            DeploymentState::Committing => self.commit(run, progress).await,
            DeploymentState::Pushing => self.push(run, progress).await,
            DeploymentState::Deploying => self.deploy(run, targets, progress).await,
            DeploymentState::Idle | DeploymentState::Succeeded | DeploymentState::Aborted => Ok(()),
        }
    }

    async fn reset_repo(&self, progress: &ProgressReporter) -> Result<(), PipelineError> {
        progress.report("Discarding local changes...");
        self.vcs.reset_hard().await?;
        progress.report("Pulling latest changes...");
        self.vcs.pull().await?;
        progress.report(format!("Checking out '{}'...", self.settings.repo.branch));
        self.vcs.checkout(&self.settings.repo.branch).await
    }

    async fn script(
        &self,
        run: &mut DeploymentRun,
        targets: &DeploymentTargets,
        progress: &ProgressReporter,
    ) -> Result<(), PipelineError> {
        progress.report(format!(
            "Scripting {} object(s) from {}...",
            run.objects.len(),
            targets.source.target()
        ));
        let client = self.connector.connect(&targets.source).await?;
        let options = ScriptOptions::from_config(self.scripting.config());

        run.artifacts = self
            .scripting
            .script_objects(
                client.as_ref(),
                &targets.source,
                &run.objects,
                &run.working_tree,
                &options,
            )
            .await?;

        info!(artifacts = run.artifacts.len(), "Scripting finished");
        Ok(())
    }

    async fn commit(
        &self,
        run: &mut DeploymentRun,
        progress: &ProgressReporter,
    ) -> Result<(), PipelineError> {
        progress.report("Checking working tree status...");
        if !self.vcs.has_pending_changes().await? {
            info!("Working tree clean, nothing to commit");
            return Ok(());
        }

        progress.report("Committing scripts...");
        self.vcs.stage_all().await?;
        self.vcs
            .commit(&commit_message(&Local::now(), &run.objects))
            .await?;
        run.committed = true;
        Ok(())
    }

    async fn push(
        &self,
        run: &mut DeploymentRun,
        progress: &ProgressReporter,
    ) -> Result<(), PipelineError> {
        let repo = &self.settings.repo;
        progress.report(format!("Pushing to {}/{}...", repo.remote, repo.branch));
        self.vcs.push(&repo.remote, &repo.branch).await?;
        run.pushed = true;
        Ok(())
    }

    async fn deploy(
        &self,
        run: &mut DeploymentRun,
        targets: &DeploymentTargets,
        progress: &ProgressReporter,
    ) -> Result<(), PipelineError> {
        let scripts: Vec<PathBuf> = run
            .artifacts
            .iter()
            .map(|a| a.path.clone())
            .sorted()
            .dedup()
            .collect();
        if scripts.is_empty() {
            warn!(working_tree = %run.working_tree.display(), "No scripts produced for the requested objects");
            return Ok(());
        }

        progress.report(format!(
            "Connecting to {}...",
            targets.destination.target()
        ));
        let client = self.connector.connect(&targets.destination).await?;

        for script in scripts {
            progress.report(format!("Executing {}...", script.display()));
            for batch in read_script_batches(&script)? {
                client.execute(&batch).await.map_err(|e| match e {
                    PipelineError::Execution(message) => {
                        PipelineError::Execution(format!("{}: {}", script.display(), message))
                    }
                    other => other,
                })?;
            }
            info!(script = %script.display(), "Executed script");
            run.executed_scripts.push(script);
        }

        Ok(())
    }
}

/// Folder of the working tree holding the destination's scripts.
pub fn destination_working_tree(repo_root: &Path, destination: &DatabaseConfig) -> PathBuf {
    match destination.local_path.as_deref().map(str::trim) {
        Some(local) if !local.is_empty() => repo_root.join(local),
        _ => repo_root.to_path_buf(),
    }
}

/// `<YYYYMMDD_HH:MM:SS.mmm> - <schema.name> <schema.name> ...`
pub fn commit_message<Tz: TimeZone>(at: &DateTime<Tz>, objects: &[ObjectName]) -> String {
    format!(
        "{} - {}",
        commit_timestamp(at),
        objects
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    )
}
