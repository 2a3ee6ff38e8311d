use std::path::Path;

use chrono::NaiveDate;

use crate::{
    config::{DEFAULT_PORT, DatabaseConfig, ScripterConfig},
    types::{DatabaseObject, ObjectKind, ScriptFolder},
};

/// What to script and how, for one scripting request.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub drop_and_recreate: bool,
    pub file_per_object: bool,
    /// When set, only these kinds are scripted.
    pub include_kinds: Vec<ObjectKind>,
    pub exclude_kinds: Vec<ObjectKind>,
    /// Pass the object list to the tool. Without it the tool scripts every
    /// object of the folder's type.
    pub select_objects: bool,
}

impl ScriptOptions {
    pub fn from_config(config: &ScripterConfig) -> Self {
        Self {
            drop_and_recreate: config.drop_and_recreate,
            file_per_object: config.file_per_object,
            include_kinds: Vec::new(),
            exclude_kinds: Vec::new(),
            select_objects: true,
        }
    }

    pub fn admits(&self, kind: ObjectKind) -> bool {
        (self.include_kinds.is_empty() || self.include_kinds.contains(&kind))
            && !self.exclude_kinds.contains(&kind)
    }
}

fn server_arg(database: &DatabaseConfig) -> String {
    if database.port == DEFAULT_PORT {
        database.host.clone()
    } else {
        format!("{}:{}", database.host, database.port)
    }
}

/// `<host>_<database>_<n>-Objects_<YYYYMMDD>.sql`
pub fn single_file_name(database: &DatabaseConfig, count: usize, day: NaiveDate) -> String {
    format!(
        "{}_{}_{}-Objects_{}.sql",
        database.host,
        database.database,
        count,
        day.format("%Y%m%d")
    )
}

/// Argument vector for one scripter call covering a single folder.
pub fn build_args(
    config: &ScripterConfig,
    database: &DatabaseConfig,
    options: &ScriptOptions,
    folder: ScriptFolder,
    objects: &[&DatabaseObject],
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = Some(config.subcommand.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .into_iter()
        .collect();

    args.extend([
        "--server".to_string(),
        server_arg(database),
        "--database".to_string(),
        database.database.clone(),
        "--user".to_string(),
        database.username.clone(),
        "--password".to_string(),
        database.password.clone(),
    ]);

    if config.display_progress {
        args.push("--display-progress".to_string());
    }
    if config.exclude_headers {
        args.push("--exclude-headers".to_string());
    }

    if options.drop_and_recreate {
        args.push("--script-drop-create".to_string());
        args.push("--check-for-existence".to_string());
    } else {
        args.push("--script-create".to_string());
    }

    if options.file_per_object {
        args.push("--file-per-object".to_string());
    }

    match folder.scripter_type() {
        Some(scripter_type) => {
            args.push("--include-types".to_string());
            args.push(scripter_type.to_string());
        }
        None => {
            args.push("--exclude-types".to_string());
            args.extend(
                ScriptFolder::named_scripter_types()
                    .into_iter()
                    .map(str::to_string),
            );
        }
    }

    if options.select_objects && !objects.is_empty() {
        args.push("--include-objects".to_string());
        args.extend(objects.iter().map(|o| o.name.quoted()));
    }

    args.push("--file-path".to_string());
    args.push(output.to_string_lossy().into_owned());

    args
}
