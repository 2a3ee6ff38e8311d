use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::Serialize;
use strum_macros::Display;
use tracing::{Instrument, info, info_span, warn};

use crate::{
    config::{BackupConfig, DatabaseConfig},
    db::{DatabaseClient, DatabaseConnector, fetch_inventory},
    errors::PipelineError,
    scripting::{ScriptOptions, ScriptingAdapter},
    types::{DatabaseObject, ScriptFolder, ScriptedArtifact},
    utils::{ProgressReporter, RunLog, ensure_dir},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackupMode {
    /// Only objects changed since the last recorded run.
    Changed,
    /// Every object in the catalog.
    Full,
}

#[derive(Debug, Clone)]
pub enum BackupOutcome {
    NoChanges {
        since: Option<NaiveDateTime>,
    },
    Completed {
        root: PathBuf,
        objects: usize,
        artifacts: Vec<ScriptedArtifact>,
        marker: NaiveDateTime,
    },
}

/// Objects a backup has to script and the marker they were listed from.
#[derive(Debug, Clone)]
pub struct BackupChanges {
    pub since: Option<NaiveDateTime>,
    pub objects: Vec<DatabaseObject>,
}

/// Scripts database objects into a per-database backup folder and tracks
/// the last successful run so later runs only pick up new changes.
pub struct BackupService {
    config: BackupConfig,
    scripting: Arc<ScriptingAdapter>,
    connector: Arc<dyn DatabaseConnector>,
}

impl BackupService {
    pub fn new(
        config: BackupConfig,
        scripting: Arc<ScriptingAdapter>,
        connector: Arc<dyn DatabaseConnector>,
    ) -> Self {
        Self {
            config,
            scripting,
            connector,
        }
    }

    /// `<base>/<host>_<database>`, or the base itself when it already ends
    /// with the database name.
    pub fn backup_root(&self, database: &DatabaseConfig) -> PathBuf {
        let base = Path::new(&self.config.path);
        let ends_with_database = base
            .file_name()
            .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(&database.database));

        if ends_with_database {
            base.to_path_buf()
        } else {
            base.join(format!("{}_{}", database.host, database.database))
        }
    }

    pub fn run_log(&self, database: &DatabaseConfig) -> RunLog {
        RunLog::new(
            self.backup_root(database).join(&self.config.log_file),
            &self.scripting.config().program,
        )
    }

    /// Last recorded run for the database, if any.
    pub fn last_run_marker(
        &self,
        database: &DatabaseConfig,
    ) -> Result<Option<NaiveDateTime>, PipelineError> {
        self.run_log(database).last_run()
    }

    /// Objects changed at or after the last-run marker, with the marker the
    /// listing used. Without a marker every object is returned.
    pub async fn changes_since_last_run(
        &self,
        client: &dyn DatabaseClient,
        database: &DatabaseConfig,
    ) -> Result<BackupChanges, PipelineError> {
        let since = self.last_run_marker(database)?;
        let objects = fetch_inventory(client, since).await?.into_objects();
        Ok(BackupChanges { since, objects })
    }

    /// Creates the backup root and every kind sub-folder.
    pub fn prepare_folders(&self, database: &DatabaseConfig) -> Result<PathBuf, PipelineError> {
        let root = self.backup_root(database);
        for folder in ScriptFolder::ALL {
            ensure_dir(&root.join(folder.dir_name()))?;
        }
        Ok(root)
    }

    /// Runs one backup. The marker is read once and only advanced after
    /// every object was scripted into at least one file, so a failed run is
    /// retried in full next time. The new marker is the time this run
    /// started, truncated to the run log's whole seconds, which keeps edits
    /// made while it was running in the next slice.
    pub async fn run(
        &self,
        database: &DatabaseConfig,
        mode: BackupMode,
        progress: &ProgressReporter,
    ) -> Result<BackupOutcome, PipelineError> {
        let span = info_span!("backup", target_db = %database.target(), %mode);

        async {
            let started = Local::now().naive_local().trunc_subsecs(0);

            progress.report("Preparing backup folders...");
            let root = self.prepare_folders(database)?;

            progress.report(format!("Connecting to {}...", database.target()));
            let client = self.connector.connect(database).await?;

            progress.report(match mode {
                BackupMode::Changed => "Listing objects changed since the last run...",
                BackupMode::Full => "Listing all objects...",
            });
            let BackupChanges { since, objects } = match mode {
                BackupMode::Full => BackupChanges {
                    since: None,
                    objects: fetch_inventory(client.as_ref(), None)
                        .await?
                        .into_objects(),
                },
                BackupMode::Changed => {
                    let changes = self
                        .changes_since_last_run(client.as_ref(), database)
                        .await?;
                    if changes.since.is_none() && !self.config.full_on_missing_marker {
                        return Err(PipelineError::Config(format!(
                            "No previous backup recorded in '{}'; run a full backup first",
                            self.run_log(database).path().display()
                        )));
                    }
                    changes
                }
            };

            if objects.is_empty() {
                warn!(since = ?since, "No object changes");
                return Ok(BackupOutcome::NoChanges { since });
            }

            let options = ScriptOptions {
                select_objects: since.is_some(),
                ..ScriptOptions::from_config(self.scripting.config())
            };

            progress.report(format!("Scripting {} object(s)...", objects.len()));
            let artifacts = self
                .scripting
                .script_resolved(database, &objects, &root, &options)
                .await?;

            if artifacts.is_empty() {
                return Err(PipelineError::ScriptingTool(format!(
                    "no scripts were produced for {} object(s) of {}",
                    objects.len(),
                    database.target()
                )));
            }

            self.run_log(database).record_run(
                started,
                &format!("backup {} {} objects", database.target(), objects.len()),
            )?;

            info!(
                objects = objects.len(),
                artifacts = artifacts.len(),
                "Backup completed"
            );
            Ok(BackupOutcome::Completed {
                root,
                objects: objects.len(),
                artifacts,
                marker: started,
            })
        }
        .instrument(span)
        .await
    }
}
