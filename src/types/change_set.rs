use serde::Serialize;
use strum_macros::Display;

use colored::*;

use crate::types::{DatabaseObject, Fingerprint, ObjectKind, ObjectName};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeCategory {
    ToCreate,
    ToModify,
    Unchanged,
}

impl ChangeCategory {
    pub fn to_colored_string(&self) -> String {
        match self {
            ChangeCategory::ToCreate => "CREATE".green().bold().to_string(),
            ChangeCategory::ToModify => "MODIFY".yellow().bold().to_string(),
            ChangeCategory::Unchanged => "UNCHANGED".bright_black().to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InventorySide {
    Source,
    Destination,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModifiedObject {
    pub source: DatabaseObject,
    pub destination: DatabaseObject,
    pub source_fingerprint: Option<Fingerprint>,
    pub destination_fingerprint: Option<Fingerprint>,
}

/// Raised when one inventory holds the same name twice. The first entry
/// wins and the rest are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateObjectWarning {
    pub name: ObjectName,
    pub side: InventorySide,
    pub kept: ObjectKind,
    pub ignored: ObjectKind,
}

/// Result of comparing a source inventory against a destination inventory.
/// Every source object lands in exactly one bucket; each bucket is sorted by
/// name. Objects that exist only in the destination are not reported.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeSet {
    pub to_create: Vec<DatabaseObject>,
    pub to_modify: Vec<ModifiedObject>,
    pub unchanged: Vec<DatabaseObject>,
    pub warnings: Vec<DuplicateObjectWarning>,
}

impl ChangeSet {
    /// True when nothing needs deploying.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_modify.is_empty()
    }

    pub fn changed_names(&self) -> Vec<ObjectName> {
        self.to_create
            .iter()
            .map(|o| o.name.clone())
            .chain(self.to_modify.iter().map(|m| m.source.name.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_modify.len() + self.unchanged.len()
    }

    /// All classified source objects with their category, in bucket order.
    pub fn entries(&self) -> impl Iterator<Item = (ChangeCategory, &DatabaseObject)> {
        self.to_create
            .iter()
            .map(|o| (ChangeCategory::ToCreate, o))
            .chain(
                self.to_modify
                    .iter()
                    .map(|m| (ChangeCategory::ToModify, &m.source)),
            )
            .chain(self.unchanged.iter().map(|o| (ChangeCategory::Unchanged, o)))
    }
}
