use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use chrono::Local;
use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    config::{DatabaseConfig, ScripterConfig},
    db::{DatabaseClient, fetch_inventory, resolve_objects},
    errors::PipelineError,
    process::{Invocation, ProcessRunner},
    scripting::{ScriptOptions, build_args, single_file_name},
    types::{DatabaseObject, ObjectName, ScriptFolder, ScriptedArtifact},
    utils::{ensure_dir, file_matches_object, modification_times, written_since},
};

/// Produces script files for database objects by driving the external
/// scripting tool, one call per target folder.
pub struct ScriptingAdapter {
    config: ScripterConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl ScriptingAdapter {
    pub fn new(config: ScripterConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &ScripterConfig {
        &self.config
    }

    /// Scripts the named objects of `database` into `target`. Every name is
    /// checked against the source catalog before the tool runs, and all
    /// unknown names are reported together.
    pub async fn script_objects(
        &self,
        client: &dyn DatabaseClient,
        database: &DatabaseConfig,
        names: &[ObjectName],
        target: &Path,
        options: &ScriptOptions,
    ) -> Result<Vec<ScriptedArtifact>, PipelineError> {
        let inventory = fetch_inventory(client, None).await?;
        let objects = resolve_objects(&inventory, names)?;
        self.script_resolved(database, &objects, target, options)
            .await
    }

    /// Scripts objects already known to exist, grouped into per-kind
    /// sub-folders of `target`.
    pub async fn script_resolved(
        &self,
        database: &DatabaseConfig,
        objects: &[DatabaseObject],
        target: &Path,
        options: &ScriptOptions,
    ) -> Result<Vec<ScriptedArtifact>, PipelineError> {
        let groups = objects
            .iter()
            .filter(|o| options.admits(o.kind))
            .into_group_map_by(|o| o.kind.folder());

        if groups.is_empty() {
            warn!(target_dir = %target.display(), "No objects left to script after kind filters");
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::new();
        for (folder, group) in groups.into_iter().sorted_by_key(|(folder, _)| *folder) {
            let dir = target.join(folder.dir_name());
            ensure_dir(&dir)?;

            let output = if options.file_per_object {
                dir.clone()
            } else {
                dir.join(single_file_name(
                    database,
                    group.len(),
                    Local::now().date_naive(),
                ))
            };

            let before = modification_times(&output)?;
            self.run_scripter(database, options, folder, &group, &output)
                .await?;
            let written = written_since(&output, &before)?;

            let produced = collect_artifacts(folder, &group, &output, &written, options)?;
            info!(
                %folder,
                objects = group.len(),
                files = produced.len(),
                "Scripted folder"
            );
            artifacts.extend(produced);
        }

        Ok(artifacts)
    }

    async fn run_scripter(
        &self,
        database: &DatabaseConfig,
        options: &ScriptOptions,
        folder: ScriptFolder,
        objects: &[&DatabaseObject],
        output: &Path,
    ) -> Result<(), PipelineError> {
        let invocation = Invocation::new(
            &self.config.program,
            build_args(&self.config, database, options, folder, objects, output),
        )
        .timeout(Duration::from_secs(self.config.timeout_secs))
        .secret(&database.password);

        let result = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| PipelineError::ScriptingTool(e.to_string()))?;

        if !result.success() {
            return Err(PipelineError::ScriptingTool(format!(
                "{} failed for {} ({}): {}",
                self.config.program,
                database.target(),
                folder.dir_name(),
                result.failure_message()
            )));
        }

        Ok(())
    }
}

/// Files the tool wrote for a folder. With an explicit object list, every
/// object must be backed by at least one of them; without one, the folder
/// must have produced something.
fn collect_artifacts(
    folder: ScriptFolder,
    objects: &[&DatabaseObject],
    output: &Path,
    written: &[PathBuf],
    options: &ScriptOptions,
) -> Result<Vec<ScriptedArtifact>, PipelineError> {
    if !options.file_per_object {
        if !written.iter().any(|p| p == output) {
            return Err(PipelineError::ScriptingTool(format!(
                "expected output file '{}' was not produced",
                output.display()
            )));
        }
        return Ok(vec![ScriptedArtifact {
            path: output.to_path_buf(),
            folder,
            objects: objects.iter().map(|o| o.name.clone()).collect(),
        }]);
    }

    let mut artifacts = Vec::new();
    let mut missing = Vec::new();

    if options.select_objects {
        for object in objects {
            let mut matched = written
                .iter()
                .filter(|path| matches_file(path, &object.name))
                .peekable();
            if matched.peek().is_none() {
                missing.push(object.name.to_string());
            }
            artifacts.extend(matched.map(|path| ScriptedArtifact {
                path: path.clone(),
                folder,
                objects: vec![object.name.clone()],
            }));
        }
    } else {
        artifacts.extend(written.iter().map(|path| ScriptedArtifact {
            path: path.clone(),
            folder,
            objects: objects
                .iter()
                .filter(|o| matches_file(path, &o.name))
                .map(|o| o.name.clone())
                .collect(),
        }));
    }

    if !missing.is_empty() {
        return Err(PipelineError::ScriptingTool(format!(
            "no script file was produced for: {}",
            missing.join(", ")
        )));
    }
    if artifacts.is_empty() {
        return Err(PipelineError::ScriptingTool(format!(
            "no script file was produced in '{}' for {} object(s)",
            output.display(),
            objects.len()
        )));
    }

    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(artifacts)
}

fn matches_file(path: &Path, name: &ObjectName) -> bool {
    path.file_name()
        .is_some_and(|n| file_matches_object(&n.to_string_lossy(), name))
}
