use clap::Args;
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, new_spinner},
    },
    types::{DeploymentRun, ObjectName},
    utils::{format_duration, parsers::parse_object_name},
};

#[derive(Args, Debug, Clone)]
#[clap(after_help = r#"
EXAMPLES:
    # twig deploy stable dbo.usp_GetOrders "[sales].[Order Lines]"
    This will reset the repository, script both objects from the source of
    deployment set `stable`, commit and push the scripts, then execute them
    on the destination.
    "#)]
pub struct DeployArgs {
    /// Deployment set id, case insensitive
    #[arg(required = true)]
    set: String,

    /// Objects to deploy as schema.name, brackets or quotes allowed
    #[arg(required = true, value_parser = parse_object_name)]
    objects: Vec<ObjectName>,
}

#[derive(Tabled)]
struct ScriptRow {
    #[tabled(rename = "#")]
    index: String,

    #[tabled(rename = "Executed script")]
    path: String,
}

pub async fn execute(args: &DeployArgs, ctx: &Context<'_>) {
    let service = &ctx.services.deployment_service;

    let (mut run, targets) = service
        .prepare(&args.set, args.objects.clone())
        .exit_on_err(&format!("Failed to prepare deployment '{}'", args.set));

    let (spinner, progress) = new_spinner(&format!(
        "Deploying {} object(s) from {} to {}...",
        run.objects.len(),
        targets.source.target(),
        targets.destination.target()
    ));

    let result = service.run(&mut run, &targets, &progress).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => print_summary(&run),
        Err(e) => {
            print_summary(&run);
            eprintln!(
                "❌ Deployment aborted in state {}: {}",
                e.state.to_colored_string(),
                e.source
            );
            std::process::exit(1);
        }
    }
}

fn print_summary(run: &DeploymentRun) {
    println!("{}", "=== Deployment ===".blue());
    println!("Run:       {}", run.id);
    println!("Set:       {}", run.deployment_set.green());
    println!("Objects:   {}", run.object_names().join(", "));
    println!("Scripts:   {}", run.artifacts.len());
    println!(
        "Committed: {}",
        if run.committed {
            "YES".green().to_string()
        } else {
            "NO".bright_black().to_string()
        }
    );
    println!(
        "Pushed:    {}",
        if run.pushed {
            "YES".green().to_string()
        } else {
            "NO".bright_black().to_string()
        }
    );
    println!("Duration:  {}", format_duration(run.started_at, run.ended_at));
    if let Some(outcome) = run.outcome() {
        println!("Outcome:   {}", outcome.to_colored_string());
    }

    if run.executed_scripts.is_empty() {
        return;
    }

    let rows: Vec<ScriptRow> = run
        .executed_scripts
        .iter()
        .enumerate()
        .map(|(i, path)| ScriptRow {
            index: (i + 1).to_string(),
            path: path.display().to_string(),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string();
    println!("{}", table);
}
