use std::path::PathBuf;

use serde::Serialize;

use crate::types::{ObjectName, ScriptFolder};

/// A script file produced by the scripting tool and the objects it holds.
/// In file-per-object mode `objects` has exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptedArtifact {
    pub path: PathBuf,
    pub folder: ScriptFolder,
    pub objects: Vec<ObjectName>,
}
