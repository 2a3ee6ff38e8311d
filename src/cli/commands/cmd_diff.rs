use chrono::NaiveDateTime;
use clap::Args;
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{
        Alignment, Modify, Style, Width,
        object::{Columns, Rows},
    },
};
use terminal_size::{Width as TermWidth, terminal_size};

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, new_spinner},
    },
    types::{ChangeCategory, ChangeSet},
    utils::parsers::parse_cutoff_date,
};

#[derive(Args, Debug, Clone)]
#[clap(after_help = r#"
EXAMPLES:
    # twig diff --source beta --destination prod --since 2025.01.01
    This will list every object changed on `beta` since 2025-01-01 that is
    missing on `prod` or whose definition differs there.
    "#)]
pub struct DiffArgs {
    /// Source database alias
    #[arg(long, required = true)]
    source: String,

    /// Destination database alias
    #[arg(long, required = true)]
    destination: String,

    #[arg(long, value_parser = parse_cutoff_date, long_help = "Only consider source objects changed at or after this date.\n\n\
        Example formats:\n\
        - 2023.01.01\n\
        - 2023.01.01:23.59.59"
    )]
    since: Option<NaiveDateTime>,

    /// Also list objects that are unchanged
    #[arg(long, default_value_t = false)]
    all: bool,
}

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "#")]
    index: String,

    #[tabled(rename = "Object")]
    name: String,

    #[tabled(rename = "Kind")]
    kind: String,

    #[tabled(rename = "Last change")]
    last_changed: String,

    #[tabled(rename = "Change")]
    category: String,
}

pub async fn execute(args: &DiffArgs, ctx: &Context<'_>) {
    let source = ctx
        .settings
        .database(&args.source)
        .exit_on_err("Failed to resolve source database");
    let destination = ctx
        .settings
        .database(&args.destination)
        .exit_on_err("Failed to resolve destination database");

    let (spinner, progress) = new_spinner(&format!(
        "Comparing {} with {}...",
        source.target(),
        destination.target()
    ));
    let result = ctx
        .services
        .diff_service
        .diff(source, destination, args.since, &progress)
        .await;
    spinner.finish_and_clear();

    let changes = result.exit_on_err("Failed to compare databases");
    print_changes(&changes, args.all);
}

fn print_changes(changes: &ChangeSet, include_unchanged: bool) {
    println!("{}", "=== Changes ===".blue());

    for warning in &changes.warnings {
        println!(
            "⚠️ Duplicate name {} on {} side: kept {}, ignored {}",
            warning.name, warning.side, warning.kept, warning.ignored
        );
    }

    if changes.is_empty() && !include_unchanged {
        println!("✅ No changes found ({} unchanged)", changes.unchanged.len());
        return;
    }

    let rows: Vec<ChangeRow> = changes
        .entries()
        .filter(|(category, _)| include_unchanged || *category != ChangeCategory::Unchanged)
        .enumerate()
        .map(|(i, (category, object))| ChangeRow {
            index: (i + 1).to_string(),
            name: object.name.to_string().green().to_string(),
            kind: object.kind.to_string(),
            last_changed: object
                .last_changed()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            category: category.to_colored_string(),
        })
        .collect();

    let terminal_width = if let Some((TermWidth(w), _)) = terminal_size() {
        w as usize
    } else {
        80
    };

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .with(Modify::new(Columns::one(1)).with(Width::truncate(60).suffix("...")))
        .with(Width::increase(terminal_width))
        .to_string();
    println!("{}", table);

    println!(
        "{} to create, {} to modify, {} unchanged",
        changes.to_create.len().to_string().green(),
        changes.to_modify.len().to_string().yellow(),
        changes.unchanged.len()
    );
}
