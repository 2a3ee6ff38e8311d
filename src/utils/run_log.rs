use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::PipelineError;

const MARKER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Append-only log of backup runs. Each line starts with the run timestamp
/// and names the scripting tool; the most recent parseable line is the
/// last-run marker.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
    tool: String,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>, tool: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tool: tool.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest recorded run. A missing log means no run was recorded.
    pub fn last_run(&self) -> Result<Option<NaiveDateTime>, PipelineError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PipelineError::file_system(&self.path, e)),
        };

        Ok(text
            .lines()
            .filter(|line| line.contains(&self.tool))
            .filter_map(|line| line.split_whitespace().next())
            .filter_map(parse_marker)
            .max())
    }

    /// Appends a marker line for a completed run.
    pub fn record_run(&self, at: NaiveDateTime, summary: &str) -> Result<(), PipelineError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::file_system(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PipelineError::file_system(&self.path, e))?;

        writeln!(file, "{} {} {}", at.format(MARKER_FORMAT), self.tool, summary)
            .map_err(|e| PipelineError::file_system(&self.path, e))
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS[.fff]`, the same with `_` in place of `T`,
/// or a bare date (midnight).
pub fn parse_marker(token: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d_%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
