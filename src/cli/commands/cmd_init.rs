use std::path::Path;

use clap::Subcommand;
use inquire::Confirm;

use crate::{
    cli::commands::ExitOnErr,
    utils::init::{EnvDefaults, get_env_file_with_defaults},
};

#[derive(Subcommand, Debug)]
pub enum InitCommands {
    /// initialize .env file
    Env {
        /// Overwrite existing .env file
        #[arg(short, long, default_value_t = false)]
        overwrite: bool,

        /// Repository working tree path
        #[arg(long)]
        repo_path: Option<String>,

        /// Alias of the source database
        #[arg(long)]
        source: Option<String>,

        /// Alias of the destination database
        #[arg(long)]
        destination: Option<String>,
    },
}

pub async fn execute(action: &InitCommands) {
    match action {
        InitCommands::Env {
            overwrite,
            repo_path,
            source,
            destination,
        } => {
            let base = EnvDefaults::default();
            let defaults = EnvDefaults {
                repo_path: repo_path.clone().unwrap_or(base.repo_path),
                source_alias: source.clone().unwrap_or(base.source_alias),
                destination_alias: destination.clone().unwrap_or(base.destination_alias),
            };
            init_env_file(*overwrite, &defaults)
        }
    }
}

fn init_env_file(overwrite: bool, defaults: &EnvDefaults) {
    let env_file = get_env_file_with_defaults("env.default.jinja", defaults)
        .exit_on_err("Failed to get env file");

    if Path::new(".env").exists() && !overwrite {
        let should_overwrite =
            Confirm::new("A .env file already exists. Do you want to overwrite it?")
                .with_default(false)
                .prompt()
                .unwrap_or(false);

        if !should_overwrite {
            println!("Exiting...");
            return;
        }
    }

    std::fs::write(".env", env_file).exit_on_err("Failed to create .env file");
    println!("✅ Successfully created .env file.");
}
