pub mod cmd_backup;
pub mod cmd_config;
pub mod cmd_ddl;
pub mod cmd_deploy;
pub mod cmd_diff;
pub mod cmd_init;
pub mod cmd_script;
pub mod cmd_version;

use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::{
    cli::commands::{
        cmd_backup::BackupArgs, cmd_ddl::DdlArgs, cmd_deploy::DeployArgs, cmd_diff::DiffArgs,
        cmd_init::InitCommands, cmd_script::ScriptArgs, cmd_version::VersionCommand,
    },
    utils::ProgressReporter,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Script objects into the repository, push and run them on the destination
    Deploy(DeployArgs),

    /// Compare two databases and list objects to create or modify
    Diff(DiffArgs),

    /// Script changed objects of a database into its backup folder
    Backup(BackupArgs),

    /// Script named objects into a folder
    Script(ScriptArgs),

    /// Print the effective configuration, secrets masked
    Config,

    /// Write Oracle DDL scripts, driven by the scripting adapter
    #[command(hide = true)]
    Ddl(DdlArgs),

    /// Initialize application
    Init {
        #[command(subcommand)]
        action: InitCommands,
    },

    /// Print version
    Version(VersionCommand),
}

pub trait ExitOnErr<T> {
    fn exit_on_err(self, msg: &str) -> T;
}

impl<T, E: std::fmt::Display> ExitOnErr<T> for Result<T, E> {
    fn exit_on_err(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("❌ {}: {}", msg, e);
                std::process::exit(1);
            }
        }
    }
}

/// Spinner fed by the returned reporter. Messages are drained on a
/// background task until the reporter is dropped.
pub fn new_spinner(initial: &str) -> (ProgressBar, ProgressReporter) {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(initial.to_string());

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let spinner_clone = spinner.clone();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            spinner_clone.set_message(msg);
        }
    });

    (spinner, ProgressReporter::new(Some(tx)))
}
