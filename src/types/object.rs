use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::types::{Fingerprint, ObjectKind, ObjectName};

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseObject {
    pub name: ObjectName,
    pub kind: ObjectKind,
    pub created: NaiveDateTime,
    pub modified: Option<NaiveDateTime>,
    pub definition: Option<String>,
}

impl DatabaseObject {
    /// Modification time, falling back to creation time for objects that
    /// were never altered.
    pub fn last_changed(&self) -> NaiveDateTime {
        self.modified.unwrap_or(self.created)
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.definition.as_deref().map(Fingerprint::of)
    }
}

/// Snapshot of one database's catalog, ordered by object name.
#[derive(Debug, Clone)]
pub struct ObjectInventory {
    objects: Vec<DatabaseObject>,
    captured_at: NaiveDateTime,
}

impl ObjectInventory {
    pub fn new(mut objects: Vec<DatabaseObject>) -> Self {
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            objects,
            captured_at: Local::now().naive_local(),
        }
    }

    pub fn objects(&self) -> &[DatabaseObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<DatabaseObject> {
        self.objects
    }

    pub fn captured_at(&self) -> NaiveDateTime {
        self.captured_at
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn find(&self, name: &ObjectName) -> Option<&DatabaseObject> {
        self.objects.iter().find(|o| &o.name == name)
    }
}

impl Default for ObjectInventory {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
