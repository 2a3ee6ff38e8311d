use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, new_spinner},
    },
    scripting::ScriptOptions,
    types::{ObjectKind, ObjectName},
    utils::parsers::{parse_object_kind, parse_object_name},
};

#[derive(Args, Debug, Clone)]
#[clap(after_help = r#"
EXAMPLES:
    # twig script --database beta --out ./out dbo.usp_GetOrders dbo.vw_Orders
    This will script both objects into ./out/procedures and ./out/views.

    # twig script --database beta --out ./out --single-file --create-only dbo.Orders
    This will write one CREATE-only file per folder instead of one file per object.
    "#)]
pub struct ScriptArgs {
    /// Database alias
    #[arg(long, required = true)]
    database: String,

    /// Output directory, kind sub-folders are created below it
    #[arg(long, value_name = "DIR", required = true)]
    out: PathBuf,

    /// Script CREATE statements only, without DROP and existence checks
    #[arg(long, default_value_t = false)]
    create_only: bool,

    /// One file per folder instead of one file per object
    #[arg(long, default_value_t = false)]
    single_file: bool,

    /// Comma-separated object kinds to script, e.g. view,procedure
    #[arg(long, value_delimiter = ',', value_parser = parse_object_kind)]
    include_type: Vec<ObjectKind>,

    /// Comma-separated object kinds to skip
    #[arg(long, value_delimiter = ',', value_parser = parse_object_kind)]
    exclude_type: Vec<ObjectKind>,

    /// Objects to script as schema.name
    #[arg(required = true, value_parser = parse_object_name)]
    objects: Vec<ObjectName>,
}

impl ScriptArgs {
    fn options(&self, defaults: ScriptOptions) -> ScriptOptions {
        ScriptOptions {
            drop_and_recreate: defaults.drop_and_recreate && !self.create_only,
            file_per_object: defaults.file_per_object && !self.single_file,
            include_kinds: self.include_type.clone(),
            exclude_kinds: self.exclude_type.clone(),
            select_objects: true,
        }
    }
}

pub async fn execute(args: &ScriptArgs, ctx: &Context<'_>) {
    let database = ctx
        .settings
        .database(&args.database)
        .exit_on_err("Failed to resolve database");
    let scripting = &ctx.services.scripting;
    let options = args.options(ScriptOptions::from_config(scripting.config()));

    let (spinner, progress) = new_spinner(&format!(
        "Connecting to {}...",
        database.target()
    ));
    let client = ctx.services.connector.connect(database).await;
    let client = client.exit_on_err("Failed to connect");

    progress.report(format!("Scripting {} object(s)...", args.objects.len()));
    let result = scripting
        .script_objects(client.as_ref(), database, &args.objects, &args.out, &options)
        .await;
    spinner.finish_and_clear();

    let artifacts = result.exit_on_err("Scripting failed");
    for artifact in &artifacts {
        println!(
            "{} {}",
            artifact.folder.dir_name().blue(),
            artifact.path.display()
        );
    }
    println!("✅ Wrote {} file(s)", artifacts.len());
}
