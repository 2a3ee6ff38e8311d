use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    config::{DEFAULT_PORT, DatabaseConfig},
    db::{DatabaseClient, fetch_inventory, resolve_objects},
    errors::PipelineError,
    types::{DatabaseObject, ObjectKind, ObjectName},
    utils::{ensure_dir, sql_literal},
};

/// Oracle errors meaning the dropped object was not there.
const NOT_FOUND_CODES: [i32; 4] = [-4043, -942, -2289, -1434];

/// One scripting request as received on the command line.
#[derive(Debug, Clone, Default)]
pub struct DdlRequest {
    pub drop_create: bool,
    pub check_for_existence: bool,
    pub file_per_object: bool,
    pub exclude_headers: bool,
    pub include_types: Vec<String>,
    pub exclude_types: Vec<String>,
    /// Empty means every object admitted by the type filters.
    pub objects: Vec<ObjectName>,
    pub output: PathBuf,
}

impl DdlRequest {
    /// Type filters work on scripter type names. Kinds of the catch-all
    /// folder have none, so only an include list can leave them out.
    pub fn admits(&self, kind: ObjectKind) -> bool {
        let type_name = kind.folder().scripter_type();
        let listed = |names: &[String]| {
            type_name.is_some_and(|t| names.iter().any(|n| n.eq_ignore_ascii_case(t)))
        };

        (self.include_types.is_empty() || listed(&self.include_types))
            && !listed(&self.exclude_types)
    }
}

/// Splits `host` or `host:port` into a connection for the given service.
pub fn connection_config(
    server: &str,
    database: &str,
    username: &str,
    password: &str,
) -> Result<DatabaseConfig, PipelineError> {
    let (host, port) = match server.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.trim().parse::<u16>().map_err(|_| {
                PipelineError::Config(format!("Invalid port in server '{}'", server))
            })?;
            (host.trim(), port)
        }
        None => (server.trim(), DEFAULT_PORT),
    };

    if host.is_empty() {
        return Err(PipelineError::Config(format!(
            "Invalid server '{}': host is empty",
            server
        )));
    }

    Ok(DatabaseConfig {
        host: host.to_string(),
        port,
        database: database.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        local_path: None,
    })
}

/// Writes DDL scripts for the requested objects and returns the files written.
pub async fn write_ddl(
    client: &dyn DatabaseClient,
    request: &DdlRequest,
) -> Result<Vec<PathBuf>, PipelineError> {
    let inventory = fetch_inventory(client, None).await?;
    let objects = if request.objects.is_empty() {
        inventory.into_objects()
    } else {
        resolve_objects(&inventory, &request.objects)?
    };
    let objects: Vec<DatabaseObject> = objects
        .into_iter()
        .filter(|o| request.admits(o.kind))
        .collect();

    let mut scripts = Vec::with_capacity(objects.len());
    for object in &objects {
        let ddl = client.definition(object).await?.ok_or_else(|| {
            PipelineError::ScriptingTool(format!(
                "no DDL available for {} ({})",
                object.name, object.kind
            ))
        })?;
        debug!(object = %object.name, bytes = ddl.len(), "Fetched DDL");
        scripts.push((object, render_object(object, &ddl, request)));
    }

    if scripts.is_empty() {
        info!(output = %request.output.display(), "Nothing to script");
        return Ok(Vec::new());
    }

    let written = if request.file_per_object {
        ensure_dir(&request.output)?;
        let mut written = Vec::with_capacity(scripts.len());
        for (object, text) in &scripts {
            let path = request.output.join(script_file_name(object));
            write_file(&path, text)?;
            written.push(path);
        }
        written
    } else {
        if let Some(parent) = request.output.parent() {
            ensure_dir(parent)?;
        }
        let text = scripts.iter().map(|(_, text)| text).join("\n");
        write_file(&request.output, &text)?;
        vec![request.output.clone()]
    };

    info!(
        objects = scripts.len(),
        files = written.len(),
        "DDL written"
    );
    Ok(written)
}

/// `<schema>.<name>.<Type>.sql`
pub fn script_file_name(object: &DatabaseObject) -> String {
    format!("{}.{}.sql", object.name, type_token(object.kind))
}

fn type_token(kind: ObjectKind) -> String {
    match kind.folder().scripter_type() {
        Some(scripter_type) => scripter_type.to_string(),
        None => {
            let name = kind.to_string();
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => name,
            }
        }
    }
}

/// Script text for one object: optional header, optional drop batch, then
/// the DDL, every batch closed by a `/` line.
pub fn render_object(object: &DatabaseObject, ddl: &str, request: &DdlRequest) -> String {
    let mut text = String::new();

    if !request.exclude_headers {
        text.push_str(&format!("-- {} ({})\n", object.name, type_token(object.kind)));
    }

    if request.drop_create {
        if let Some(drop) = drop_statement(object) {
            if request.check_for_existence {
                text.push_str(&guarded(&drop));
            } else {
                text.push_str(&drop);
            }
            text.push_str("\n/\n");
        }
    }

    text.push_str(ddl.trim().trim_end_matches('/').trim_end());
    text.push_str("\n/\n");
    text
}

fn drop_statement(object: &DatabaseObject) -> Option<String> {
    let target = format!(
        "{}.{}",
        quote_identifier(object.name.schema()),
        quote_identifier(object.name.name())
    );

    let statement = match object.kind {
        ObjectKind::Table => format!("DROP TABLE {} CASCADE CONSTRAINTS", target),
        ObjectKind::Type => format!("DROP TYPE {} FORCE", target),
        ObjectKind::View
        | ObjectKind::Function
        | ObjectKind::Procedure
        | ObjectKind::Trigger
        | ObjectKind::Sequence
        | ObjectKind::Synonym
        | ObjectKind::Package => format!("DROP {} {}", object.kind.catalog_name(), target),
        ObjectKind::Database | ObjectKind::Other => return None,
    };
    Some(statement)
}

fn guarded(statement: &str) -> String {
    let codes = NOT_FOUND_CODES.iter().map(|c| c.to_string()).join(", ");
    format!(
        "BEGIN\n  EXECUTE IMMEDIATE '{}';\nEXCEPTION\n  WHEN OTHERS THEN\n    IF SQLCODE NOT IN ({}) THEN\n      RAISE;\n    END IF;\nEND;",
        sql_literal(statement),
        codes
    )
}

fn quote_identifier(part: &str) -> String {
    format!("\"{}\"", part.replace('"', "\"\""))
}

fn write_file(path: &Path, text: &str) -> Result<(), PipelineError> {
    std::fs::write(path, text).map_err(|e| PipelineError::file_system(path, e))
}
