use clap::Args;
use colored::Colorize;

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, new_spinner},
    },
    services::{BackupMode, BackupOutcome},
};

#[derive(Args, Debug, Clone)]
#[clap(after_help = r#"
EXAMPLES:
    # twig backup --database prod
    This will script every object of `prod` changed since the last recorded
    backup into `<backup.path>/<host>_<database>`.

    # twig backup --database prod --full
    This will script every object regardless of the last recorded backup.
    "#)]
pub struct BackupArgs {
    /// Database alias
    #[arg(long, required = true)]
    database: String,

    /// Ignore the last recorded backup and script every object
    #[arg(long, default_value_t = false)]
    full: bool,
}

pub async fn execute(args: &BackupArgs, ctx: &Context<'_>) {
    let database = ctx
        .settings
        .database(&args.database)
        .exit_on_err("Failed to resolve database");
    let mode = if args.full {
        BackupMode::Full
    } else {
        BackupMode::Changed
    };

    let (spinner, progress) =
        new_spinner(&format!("Backing up {} ({})...", database.target(), mode));
    let result = ctx
        .services
        .backup_service
        .run(database, mode, &progress)
        .await;
    spinner.finish_and_clear();

    match result.exit_on_err(&format!("Backup of '{}' failed", database.target())) {
        BackupOutcome::NoChanges { since } => match since {
            Some(marker) => println!("✅ No object changes since {}", marker),
            None => println!("✅ No objects found"),
        },
        BackupOutcome::Completed {
            root,
            objects,
            artifacts,
            marker,
        } => {
            println!(
                "✅ Backed up {} object(s) into {} ({} file(s))",
                objects.to_string().green(),
                root.display().to_string().blue(),
                artifacts.len()
            );
            println!("Next backup picks up changes from {}", marker);
        }
    }
}
