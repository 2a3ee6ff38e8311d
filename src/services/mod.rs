pub mod backup_service;
pub mod deployment_service;
pub mod diff_service;

use std::{path::PathBuf, sync::Arc};

pub use backup_service::{BackupChanges, BackupMode, BackupOutcome, BackupService};
pub use deployment_service::{DeploymentService, DeploymentTargets};
pub use diff_service::DiffService;

use crate::{
    config::Settings,
    db::DatabaseConnector,
    oracle::OracleConnector,
    process::{ProcessRunner, SystemProcessRunner},
    scripting::ScriptingAdapter,
    vcs::{GitCli, VersionControl},
};

pub struct AppServices {
    pub deployment_service: DeploymentService,
    pub backup_service: BackupService,
    pub diff_service: DiffService,
    pub scripting: Arc<ScriptingAdapter>,
    pub connector: Arc<dyn DatabaseConnector>,
}

impl AppServices {
    pub fn new(settings: &Settings) -> Self {
        Self::with_components(
            settings,
            Arc::new(SystemProcessRunner),
            Arc::new(OracleConnector),
            None,
        )
    }

    /// Wires the services on top of the given runner and connector. Without
    /// `vcs`, git is driven through `runner` in the configured repository.
    pub fn with_components(
        settings: &Settings,
        runner: Arc<dyn ProcessRunner>,
        connector: Arc<dyn DatabaseConnector>,
        vcs: Option<Arc<dyn VersionControl>>,
    ) -> Self {
        let scripting = Arc::new(ScriptingAdapter::new(
            settings.scripter.clone(),
            runner.clone(),
        ));

        let vcs: Arc<dyn VersionControl> = vcs.unwrap_or_else(|| {
            let work_tree = settings
                .repo
                .path
                .as_deref()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            Arc::new(GitCli::new(&settings.repo, work_tree, runner)) as Arc<dyn VersionControl>
        });

        Self {
            deployment_service: DeploymentService::new(
                settings.clone(),
                vcs,
                scripting.clone(),
                connector.clone(),
            ),
            backup_service: BackupService::new(
                settings.backup.clone(),
                scripting.clone(),
                connector.clone(),
            ),
            diff_service: DiffService::new(connector.clone()),
            scripting,
            connector,
        }
    }
}
