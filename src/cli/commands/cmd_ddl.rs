use std::path::PathBuf;

use clap::Args;

use crate::{
    cli::{Context, commands::ExitOnErr},
    scripting::ddl::{DdlRequest, connection_config, write_ddl},
    types::ObjectName,
    utils::parsers::parse_object_name,
};

/// Scripting tool arguments, as passed by the scripting adapter.
#[derive(Args, Debug, Clone)]
pub struct DdlArgs {
    #[arg(long)]
    server: String,

    #[arg(long)]
    database: String,

    #[arg(long)]
    user: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    password: String,

    #[arg(long, default_value_t = false)]
    display_progress: bool,

    #[arg(long, default_value_t = false)]
    exclude_headers: bool,

    #[arg(long, default_value_t = false)]
    script_create: bool,

    #[arg(long, default_value_t = false, conflicts_with = "script_create")]
    script_drop_create: bool,

    #[arg(long, default_value_t = false)]
    check_for_existence: bool,

    #[arg(long, default_value_t = false)]
    file_per_object: bool,

    #[arg(long, num_args = 1..)]
    include_types: Vec<String>,

    #[arg(long, num_args = 1..)]
    exclude_types: Vec<String>,

    #[arg(long, num_args = 1.., value_parser = parse_object_name)]
    include_objects: Vec<ObjectName>,

    #[arg(long)]
    file_path: PathBuf,
}

impl DdlArgs {
    fn request(&self) -> DdlRequest {
        DdlRequest {
            drop_create: self.script_drop_create,
            check_for_existence: self.check_for_existence,
            file_per_object: self.file_per_object,
            exclude_headers: self.exclude_headers,
            include_types: self.include_types.clone(),
            exclude_types: self.exclude_types.clone(),
            objects: self.include_objects.clone(),
            output: self.file_path.clone(),
        }
    }
}

pub async fn execute(args: &DdlArgs, ctx: &Context<'_>) {
    let database = connection_config(&args.server, &args.database, &args.user, &args.password)
        .exit_on_err("Invalid connection arguments");

    let client = ctx
        .services
        .connector
        .connect(&database)
        .await
        .exit_on_err("Failed to connect");

    let written = write_ddl(client.as_ref(), &args.request())
        .await
        .exit_on_err("Scripting failed");

    if args.display_progress {
        for path in &written {
            println!("Scripted {}", path.display());
        }
    }
    println!("Scripted {} file(s)", written.len());
}
