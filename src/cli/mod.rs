mod commands;

use clap::Parser;
use colored::Colorize;

use crate::cli::commands::{
    Commands, cmd_backup, cmd_config, cmd_ddl, cmd_deploy, cmd_diff, cmd_init, cmd_script,
    cmd_version,
};
use crate::config::Settings;
use crate::services::AppServices;

pub struct Context<'a> {
    pub settings: &'a Settings,
    pub services: &'a AppServices,
}

#[derive(Parser, Debug)]
#[command(
    name = "twig",
    about = "Twig CLI application",
    long_about = format!(
r#"{} - {}"#,
"TWIG".green().bold(),
"Script changed database objects into git and deploy them to the next environment."
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub async fn execute(&self, ctx: &Context<'_>) {
        match &self.command {
            Commands::Deploy(args) => cmd_deploy::execute(args, ctx).await,
            Commands::Diff(args) => cmd_diff::execute(args, ctx).await,
            Commands::Backup(args) => cmd_backup::execute(args, ctx).await,
            Commands::Script(args) => cmd_script::execute(args, ctx).await,
            Commands::Config => cmd_config::execute(ctx.settings).await,
            Commands::Ddl(args) => cmd_ddl::execute(args, ctx).await,
            Commands::Init { action } => cmd_init::execute(action).await,
            Commands::Version(action) => cmd_version::execute(action).await,
        }
    }
}
